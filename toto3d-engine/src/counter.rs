use std::collections::HashMap;
use std::hash::Hash;

/// Penghitung frekuensi yang mengingat urutan kemunculan pertama.
///
/// `most_common` mengurutkan berdasarkan jumlah menurun; jika seri, kunci yang
/// lebih dulu masuk menang.
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    entries: Vec<(K, u32)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K, n: u32) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += n,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, n));
            }
        }
    }

    /// Menambah `n` ke setiap kunci yang sudah ada dan memenuhi `pred`.
    pub fn add_matching(&mut self, n: u32, pred: impl Fn(&K) -> bool) {
        for (key, count) in self.entries.iter_mut() {
            if pred(key) {
                *count += n;
            }
        }
    }

    pub fn get(&self, key: &K) -> u32 {
        self.index.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn most_common(&self, n: usize) -> Vec<(K, u32)> {
        let mut sorted = self.entries.clone();
        // sort_by stabil: urutan masuk menentukan hasil seri
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    pub fn most_common_keys(&self, n: usize) -> Vec<K> {
        self.most_common(n).into_iter().map(|(k, _)| k).collect()
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for OrderedCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key, 1);
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let counter: OrderedCounter<char> = "abracadabra".chars().collect();
        assert_eq!(counter.get(&'a'), 5);
        assert_eq!(counter.get(&'b'), 2);
        assert_eq!(counter.get(&'z'), 0);
        assert_eq!(counter.len(), 5);
        assert!(counter.contains(&'d'));
        assert!(!counter.contains(&'z'));
    }

    #[test]
    fn test_keys_in_insertion_order() {
        let counter: OrderedCounter<u8> = [3, 1, 3, 2, 1].into_iter().collect();
        let keys: Vec<u8> = counter.keys().copied().collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn test_most_common_tie_break_first_seen() {
        // b, c and a all appear twice; b was seen first
        let counter: OrderedCounter<char> = "bcabcad".chars().collect();
        assert_eq!(counter.most_common_keys(3), vec!['b', 'c', 'a']);
        assert_eq!(counter.most_common(10).len(), 4);
        assert_eq!(counter.most_common(10)[3], ('d', 1));
    }

    #[test]
    fn test_add_weighted() {
        let mut counter = OrderedCounter::new();
        counter.add("x", 3);
        counter.add("y", 5);
        counter.add("x", 3);
        assert_eq!(counter.most_common(1), vec![("x", 6)]);
    }

    #[test]
    fn test_add_matching_never_inserts() {
        let mut counter: OrderedCounter<u8> = [1, 2, 3, 4].into_iter().collect();
        counter.add_matching(10, |k| k % 2 == 0);
        assert_eq!(counter.get(&2), 11);
        assert_eq!(counter.get(&3), 1);
        assert_eq!(counter.len(), 4);
        assert_eq!(counter.most_common_keys(2), vec![2, 4]);
    }

    #[test]
    fn test_empty() {
        let counter: OrderedCounter<u8> = OrderedCounter::default();
        assert!(counter.is_empty());
        assert!(counter.most_common(3).is_empty());
    }
}
