// Append-only string store with hashed lookup.
//
// Entries live in a contiguous bucket vector; the hash table chains them
// by index (0 = end of chain), so the vector may reallocate without
// invalidating anything. Hashing folds upper-cased bytes, making lookups
// case-insensitive; a case-sensitive instance keeps bytes as they are.

struct Bucket<T> {
    text: String,
    // 1-based bucket index of the next entry in the chain; 0 ends it.
    next: u32,
    obj: T,
}

pub struct StrHashPool<T> {
    buckets: Vec<Bucket<T>>,
    hash_table: Option<Vec<u32>>,
    table_size: usize,
    rehash_at: usize,
    sort_map: Option<Vec<u32>>,
    sorted: bool,
    case_sensitive: bool,
    // When false indices are in the range 0..count-1, when true 1..count.
    pub one_based: bool,
}

// Table sizes escalate through fixed primes; the paired count is the
// rehash threshold for that size.
const HASH_SIZES: [(usize, usize); 6] = [
    (97, 150),
    (9973, 10_000),
    (99_991, 100_000),
    (999_979, 1_500_000),
    (9_999_991, 15_000_000),
    (99_999_989, std::usize::MAX),
];

impl<T> StrHashPool<T> {
    pub fn new() -> StrHashPool<T> {
        StrHashPool {
            buckets: Vec::new(),
            hash_table: None,
            table_size: 0,
            rehash_at: 0,
            sort_map: None,
            sorted: false,
            case_sensitive: false,
            one_based: false,
        }
    }

    pub fn new_case_sensitive() -> StrHashPool<T> {
        let mut p = StrHashPool::new();
        p.case_sensitive = true;
        p
    }

    pub fn count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn fold(&self, b: u8) -> u8 {
        if self.case_sensitive {
            b
        } else {
            b.to_ascii_uppercase()
        }
    }

    fn hash(&self, s: &str) -> usize {
        let mut acc: i32 = 0;
        for &b in s.as_bytes() {
            acc = acc.wrapping_mul(211).wrapping_add(self.fold(b) as i32);
        }
        ((acc & 0x7FFF_FFFF) as usize) % self.table_size
    }

    fn entry_equal(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    fn table_size_for(count: usize) -> (usize, usize) {
        for &(size, next) in HASH_SIZES.iter() {
            if count < next {
                return (size, next);
            }
        }
        HASH_SIZES[HASH_SIZES.len() - 1]
    }

    fn hash_all(&mut self) {
        let (size, next) = Self::table_size_for(self.buckets.len());
        self.table_size = size;
        self.rehash_at = next;
        let mut table = vec![0u32; size];
        for n in 0..self.buckets.len() {
            let hv = {
                let mut acc: i32 = 0;
                for &b in self.buckets[n].text.as_bytes() {
                    acc = acc.wrapping_mul(211).wrapping_add(self.fold(b) as i32);
                }
                ((acc & 0x7FFF_FFFF) as usize) % size
            };
            self.buckets[n].next = table[hv];
            table[hv] = n as u32 + 1;
        }
        self.hash_table = Some(table);
    }

    fn ensure_table(&mut self) {
        if self.hash_table.is_none() || self.buckets.len() >= self.rehash_at {
            self.hash_all();
        }
    }

    fn ofs(&self, n: i32) -> usize {
        (n - if self.one_based { 1 } else { 0 }) as usize
    }

    fn public_index(&self, ix0: usize) -> i32 {
        ix0 as i32 + if self.one_based { 1 } else { 0 }
    }

    // Unconditional append; used during load when the on-disk order is
    // authoritative. The hash table is rebuilt on the next lookup.
    pub fn store(&mut self, s: &str, obj: T) -> i32 {
        self.hash_table = None;
        self.sort_map = None;
        self.sorted = false;
        self.buckets.push(Bucket {
            text: s.to_string(),
            next: 0,
            obj,
        });
        self.public_index(self.buckets.len() - 1)
    }

    // Index of an existing entry, or a freshly appended one.
    pub fn add(&mut self, s: &str, obj: T) -> i32 {
        self.ensure_table();
        let hv = self.hash(s);
        let table = self.hash_table.as_ref().unwrap_or_else(|| unreachable!());
        let mut n = table[hv];
        while n != 0 {
            let bucket = &self.buckets[n as usize - 1];
            if self.entry_equal(&bucket.text, s) {
                return self.public_index(n as usize - 1);
            }
            n = bucket.next;
        }
        let head = table[hv];
        self.buckets.push(Bucket {
            text: s.to_string(),
            next: head,
            obj,
        });
        let new_ix = self.buckets.len() as u32;
        self.hash_table.as_mut().map(|t| t[hv] = new_ix);
        self.sort_map = None;
        self.sorted = false;
        self.public_index(new_ix as usize - 1)
    }

    pub fn index_of(&mut self, s: &str) -> i32 {
        if self.buckets.is_empty() {
            return -1;
        }
        self.ensure_table();
        let hv = self.hash(s);
        let table = match self.hash_table.as_ref() {
            Some(t) => t,
            None => return -1,
        };
        let mut n = table[hv];
        while n != 0 {
            let bucket = &self.buckets[n as usize - 1];
            if self.entry_equal(&bucket.text, s) {
                return self.public_index(n as usize - 1);
            }
            n = bucket.next;
        }
        -1
    }

    // Replace the string at position n, re-hashing into the new bucket.
    pub fn rename(&mut self, n: i32, s: &str) {
        let ix = self.ofs(n);
        self.buckets[ix].text = s.to_string();
        // relinking in place is not worth it; rebuild lazily
        self.hash_table = None;
        self.sorted = false;
    }

    pub fn get_string(&self, n: i32) -> &str {
        &self.buckets[self.ofs(n)].text
    }

    pub fn get_obj(&self, n: i32) -> &T {
        &self.buckets[self.ofs(n)].obj
    }

    pub fn get_obj_mut(&mut self, n: i32) -> &mut T {
        let ix = self.ofs(n);
        &mut self.buckets[ix].obj
    }

    pub fn set_obj(&mut self, n: i32, obj: T) {
        let ix = self.ofs(n);
        self.buckets[ix].obj = obj;
    }

    // Permutation of entry positions in string order; the backing vector
    // is never reordered.
    pub fn sorted_indices(&mut self) -> &[u32] {
        if self.sort_map.is_none() {
            self.sort_map = Some((0..self.buckets.len() as u32).collect());
            self.sorted = false;
        }
        if !self.sorted {
            let case_sensitive = self.case_sensitive;
            let buckets = &self.buckets;
            self.sort_map.as_mut().map(|m| {
                m.sort_by(|&a, &b| {
                    let sa = &buckets[a as usize].text;
                    let sb = &buckets[b as usize].text;
                    if case_sensitive {
                        sa.cmp(sb)
                    } else {
                        sa.to_ascii_uppercase().cmp(&sb.to_ascii_uppercase())
                    }
                })
            });
            self.sorted = true;
        }
        self.sort_map.as_ref().map(|m| &m[..]).unwrap_or(&[])
    }

    pub fn get_sorted_string(&mut self, n: i32) -> &str {
        let ix = self.ofs(n);
        let bucket_ix = self.sorted_indices()[ix] as usize;
        &self.buckets[bucket_ix].text
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.hash_table = None;
        self.table_size = 0;
        self.rehash_at = 0;
        self.sort_map = None;
        self.sorted = false;
    }

    pub fn memory_used(&self) -> usize {
        self.buckets.iter().map(|b| b.text.len() + std::mem::size_of::<Bucket<T>>()).sum::<usize>()
            + self.table_size * std::mem::size_of::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut pool: StrHashPool<i32> = StrHashPool::new();
        pool.one_based = true;

        assert_eq!(pool.add("alpha", -1), 1);
        assert_eq!(pool.add("beta", -1), 2);
        assert_eq!(pool.add("ALPHA", -1), 1); // case-insensitive
        assert_eq!(pool.index_of("Beta"), 2);
        assert_eq!(pool.index_of("gamma"), -1);
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.get_string(1), "alpha");
    }

    #[test]
    fn test_case_sensitive_variant() {
        let mut pool: StrHashPool<i32> = StrHashPool::new_case_sensitive();
        assert_eq!(pool.add("Text", 0), 0);
        assert_eq!(pool.add("text", 0), 1);
        assert_eq!(pool.index_of("TEXT"), -1);
    }

    #[test]
    fn test_store_then_lookup() {
        let mut pool: StrHashPool<i32> = StrHashPool::new();
        pool.one_based = true;
        for i in 0..500 {
            pool.store(&format!("uel{}", i), -1);
        }
        // store bypasses the table; the next lookup rebuilds it
        assert_eq!(pool.index_of("UEL17"), 18);
        assert_eq!(pool.count(), 500);
    }

    #[test]
    fn test_rehash_growth() {
        let mut pool: StrHashPool<i32> = StrHashPool::new();
        for i in 0..20_000 {
            pool.add(&format!("entry_{}", i), 0);
        }
        assert_eq!(pool.count(), 20_000);
        assert_eq!(pool.index_of("entry_19999"), 19_999);
        assert_eq!(pool.index_of("ENTRY_42"), 42);
    }

    #[test]
    fn test_rename_rehashes() {
        let mut pool: StrHashPool<i32> = StrHashPool::new();
        pool.one_based = true;
        pool.add("old", 0);
        pool.add("other", 0);
        pool.rename(1, "new");
        assert_eq!(pool.index_of("old"), -1);
        assert_eq!(pool.index_of("new"), 1);
        assert_eq!(pool.index_of("other"), 2);
    }

    #[test]
    fn test_sorted_indices_leave_storage_alone() {
        let mut pool: StrHashPool<i32> = StrHashPool::new();
        pool.add("c", 0);
        pool.add("a", 0);
        pool.add("B", 0);
        let order: Vec<u32> = pool.sorted_indices().to_vec();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(pool.get_string(0), "c");
        assert_eq!(pool.get_sorted_string(0), "a");
    }
}
