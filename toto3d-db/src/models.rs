use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Satu hasil 4D: ribuan, ratusan, puluhan, satuan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Draw {
    digits: [u8; 4],
}

impl Draw {
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            bail!("Hasil '{}' harus tepat 4 digit", s);
        }
        let mut digits = [0u8; 4];
        for (i, &b) in bytes.iter().enumerate() {
            if !b.is_ascii_digit() {
                bail!("Hasil '{}' mengandung karakter bukan digit", s);
            }
            digits[i] = b - b'0';
        }
        Ok(Self { digits })
    }

    /// Nilai di atas 9999 dipotong ke empat digit terakhir.
    pub fn from_value(value: u16) -> Self {
        let v = value % 10_000;
        Self {
            digits: [
                (v / 1000) as u8,
                (v / 100 % 10) as u8,
                (v / 10 % 10) as u8,
                (v % 10) as u8,
            ],
        }
    }

    pub fn digits(&self) -> [u8; 4] {
        self.digits
    }

    pub fn thousands(&self) -> u8 {
        self.digits[0]
    }

    pub fn hundreds(&self) -> u8 {
        self.digits[1]
    }

    pub fn tens(&self) -> u8 {
        self.digits[2]
    }

    pub fn units(&self) -> u8 {
        self.digits[3]
    }

    /// 3D belakang (ratusan, puluhan, satuan).
    pub fn tail(&self) -> Tail {
        Tail {
            digits: [self.digits[1], self.digits[2], self.digits[3]],
        }
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.digits {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl FromStr for Draw {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Draw::parse(s)
    }
}

impl TryFrom<String> for Draw {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        Draw::parse(&s)
    }
}

impl From<Draw> for String {
    fn from(draw: Draw) -> Self {
        draw.to_string()
    }
}

/// Tiga digit (000-999), selalu ditampilkan dengan nol di depan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tail {
    digits: [u8; 3],
}

impl Tail {
    /// Nilai di atas 999 dipotong ke tiga digit terakhir.
    pub fn from_value(value: u16) -> Self {
        let v = value % 1000;
        Self {
            digits: [(v / 100) as u8, (v / 10 % 10) as u8, (v % 10) as u8],
        }
    }

    pub fn from_digits(hundreds: u8, tens: u8, units: u8) -> Self {
        Self::from_value(hundreds as u16 * 100 + tens as u16 * 10 + units as u16)
    }

    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
            bail!("3D '{}' harus tepat 3 digit", s);
        }
        Ok(Self {
            digits: [bytes[0] - b'0', bytes[1] - b'0', bytes[2] - b'0'],
        })
    }

    pub fn digits(&self) -> [u8; 3] {
        self.digits
    }

    pub fn units(&self) -> u8 {
        self.digits[2]
    }

    pub fn value(&self) -> u16 {
        self.digits[0] as u16 * 100 + self.digits[1] as u16 * 10 + self.digits[2] as u16
    }
}

impl fmt::Display for Tail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.value())
    }
}

impl FromStr for Tail {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Tail::parse(s)
    }
}

impl TryFrom<String> for Tail {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        Tail::parse(&s)
    }
}

impl From<Tail> for String {
    fn from(tail: Tail) -> Self {
        tail.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    #[default]
    HongkongPools,
    SydneyPools,
    HongkongLotto,
    SydneyLotto,
}

impl Market {
    pub const ALL: [Market; 4] = [
        Market::HongkongPools,
        Market::SydneyPools,
        Market::HongkongLotto,
        Market::SydneyLotto,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Market::HongkongPools => "hongkong_pools",
            Market::SydneyPools => "sydney_pools",
            Market::HongkongLotto => "hongkong_lotto",
            Market::SydneyLotto => "sydney_lotto",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Market::HongkongPools => "Hongkong Pools",
            Market::SydneyPools => "Sydney Pools",
            Market::HongkongLotto => "Hongkong Lotto",
            Market::SydneyLotto => "Sydney Lotto",
        }
    }

    pub fn menu_key(&self) -> &'static str {
        match self {
            Market::HongkongPools => "1",
            Market::SydneyPools => "2",
            Market::HongkongLotto => "3",
            Market::SydneyLotto => "4",
        }
    }

    pub fn from_code(code: &str) -> Option<Market> {
        Market::ALL.into_iter().find(|m| m.code() == code)
    }

    pub fn from_menu_key(key: &str) -> Option<Market> {
        Market::ALL.into_iter().find(|m| m.menu_key() == key.trim())
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Baris tersimpan, dengan urutan dan waktu pencatatan.
#[derive(Debug, Clone)]
pub struct StoredDraw {
    pub id: i64,
    pub market: Market,
    pub draw: Draw,
    pub recorded_at: String,
}
