//! Tabel simbolik: mistik baru/lama, tesson, dan shio.

/// Mistik baru: 0→8, 1→7, 2→6, 3→9, 4→5.
pub const MISTIK_BARU: [Option<u8>; 10] = [
    Some(8), Some(7), Some(6), Some(9), Some(5),
    None, None, None, None, None,
];

/// Mistik lama: 0→1, 2→5, 3→8, 4→7, 6→9.
pub const MISTIK_LAMA: [Option<u8>; 10] = [
    Some(1), None, Some(5), Some(8), Some(7),
    None, Some(9), None, None, None,
];

pub const SHIO_COUNT: u16 = 12;

pub fn mistik_baru(digit: u8) -> Option<u8> {
    MISTIK_BARU.get(digit as usize).copied().flatten()
}

pub fn mistik_lama(digit: u8) -> Option<u8> {
    MISTIK_LAMA.get(digit as usize).copied().flatten()
}

/// Semua pasangan mistik untuk satu digit, baru lebih dulu.
pub fn mystic_pairs(digit: u8) -> impl Iterator<Item = u8> {
    mistik_baru(digit).into_iter().chain(mistik_lama(digit))
}

pub fn tesson2(digit: u8) -> u8 {
    ((digit as u32).pow(2) % 10) as u8
}

pub fn tesson3(digit: u8) -> u8 {
    ((digit as u32).pow(3) % 10) as u8
}

pub fn shio(value: u16) -> u8 {
    (value % SHIO_COUNT) as u8
}
