// Sparse growable mapping from a small non-negative integer to an
// integer; unset slots read as -1.

const MAX_CAPACITY: usize = std::i32::MAX as usize;

#[derive(Default)]
pub struct IntMapping {
    map: Vec<i32>,
    highest: i32,
}

impl IntMapping {
    pub fn new() -> IntMapping {
        IntMapping {
            map: Vec::new(),
            highest: 0,
        }
    }

    pub fn highest_index(&self) -> i32 {
        self.highest
    }

    pub fn get_mapping(&self, f: i32) -> i32 {
        if f >= 0 && (f as usize) < self.map.len() {
            self.map[f as usize]
        } else {
            -1
        }
    }

    pub fn set_mapping(&mut self, f: i32, t: i32) {
        let ix = f as usize;
        if ix >= self.map.len() {
            self.grow(ix);
        }
        self.map[ix] = t;
        if f > self.highest {
            self.highest = f;
        }
    }

    // Below 1024 entries jump to 1024; below 1M double; above, grow by
    // half. The absolute cap bounds runaway indices.
    fn grow(&mut self, f: usize) {
        let mut cap = self.map.len();
        while f >= cap {
            let delta = if cap >= 1024 * 1024 {
                cap / 2
            } else if cap == 0 {
                1024
            } else {
                cap
            };
            cap = (cap + delta).min(MAX_CAPACITY);
        }
        self.map.resize(cap, -1);
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.highest = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn reserve(&mut self, n: usize) {
        self.map.reserve(n);
    }

    pub fn memory_used(&self) -> usize {
        self.map.len() * std::mem::size_of::<i32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unmapped() {
        let m = IntMapping::new();
        assert_eq!(m.get_mapping(0), -1);
        assert_eq!(m.get_mapping(5000), -1);
        assert_eq!(m.highest_index(), 0);
    }

    #[test]
    fn test_set_get() {
        let mut m = IntMapping::new();
        m.set_mapping(3, 42);
        m.set_mapping(2000, 7);
        assert_eq!(m.get_mapping(3), 42);
        assert_eq!(m.get_mapping(2000), 7);
        assert_eq!(m.get_mapping(4), -1);
        assert_eq!(m.highest_index(), 2000);
    }

    #[test]
    fn test_growth_steps() {
        let mut m = IntMapping::new();
        m.set_mapping(0, 1);
        assert!(m.memory_used() >= 1024 * std::mem::size_of::<i32>());
        m.set_mapping(1_500_000, 1);
        assert_eq!(m.get_mapping(1_500_000), 1);
        assert_eq!(m.get_mapping(1_499_999), -1);
    }

    #[test]
    fn test_clear() {
        let mut m = IntMapping::new();
        m.set_mapping(10, 10);
        m.clear();
        assert_eq!(m.get_mapping(10), -1);
        assert_eq!(m.highest_index(), 0);
        assert!(m.is_empty());
    }
}
