use crate::strhash::StrHashPool;

// One acronym entry. The code (map) is what multiplies the acronym scale
// on disk; read_map is what the reading client wants back, and auto_gen
// marks entries invented while reading unregistered codes.
pub struct Acronym {
    pub name: String,
    pub text: String,
    pub map: i32,
    pub read_map: i32,
    pub auto_gen: bool,
}

#[derive(Default)]
pub struct AcronymList {
    list: Vec<Acronym>,
}

impl AcronymList {
    pub fn new() -> AcronymList {
        AcronymList { list: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, n: usize) -> &Acronym {
        &self.list[n]
    }

    pub fn get_mut(&mut self, n: usize) -> &mut Acronym {
        &mut self.list[n]
    }

    pub fn add(&mut self, name: &str, text: &str, map: i32) -> usize {
        self.list.push(Acronym {
            name: name.to_string(),
            text: text.to_string(),
            map,
            read_map: -1,
            auto_gen: false,
        });
        self.list.len() - 1
    }

    // Linear scan; acronym counts are small.
    pub fn find_by_map(&self, map: i32) -> Option<usize> {
        self.list.iter().position(|a| a.map == map)
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.list.iter().position(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Acronym> {
        self.list.iter()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

// Append-only string pool for set texts. Slot 0 always holds the empty
// string; texts must keep their case, so the pool hashes case-sensitively.
// The payload is the client-assigned node number.
pub struct SetTextPool {
    pool: StrHashPool<i32>,
}

impl SetTextPool {
    pub fn new() -> SetTextPool {
        let mut pool = StrHashPool::new_case_sensitive();
        pool.add("", 0);
        SetTextPool { pool }
    }

    pub fn len(&self) -> usize {
        self.pool.count()
    }

    // Index of an equal string, or of a fresh entry.
    pub fn add(&mut self, s: &str) -> i32 {
        self.pool.add(s, 0)
    }

    pub fn get(&self, n: i32) -> &str {
        self.pool.get_string(n)
    }

    pub fn node(&self, n: i32) -> i32 {
        *self.pool.get_obj(n)
    }

    // Assign a node number once; returns false if already set.
    pub fn set_node(&mut self, n: i32, node: i32) -> bool {
        if n < 0 || n as usize >= self.pool.count() {
            return false;
        }
        if *self.pool.get_obj(n) != 0 {
            return false;
        }
        self.pool.set_obj(n, node);
        true
    }
}

// A filter restricts read results to an enabled set of user UELs.
pub struct Filter {
    pub nr: i32,
    pub max_uel: i32,
    // enabled UELs appear in increasing user order; probed after
    // registration finishes
    pub sorted: bool,
    map: Vec<bool>,
}

impl Filter {
    pub fn new(nr: i32, max_uel: i32) -> Filter {
        Filter {
            nr,
            max_uel,
            sorted: false,
            map: Vec::new(),
        }
    }

    pub fn in_filter(&self, user: i32) -> bool {
        user >= 0 && (user as usize) < self.map.len() && self.map[user as usize]
    }

    pub fn set_filter(&mut self, user: i32, v: bool) {
        if user < 0 {
            return;
        }
        let ix = user as usize;
        if ix >= self.map.len() {
            self.map.resize(ix + 1, false);
        }
        self.map[ix] = v;
    }

    pub fn memory_used(&self) -> usize {
        self.map.len()
    }
}

#[derive(Default)]
pub struct FilterList {
    list: Vec<Filter>,
}

impl FilterList {
    pub fn new() -> FilterList {
        FilterList { list: Vec::new() }
    }

    // Registering a filter number again replaces the old definition.
    pub fn add(&mut self, f: Filter) -> usize {
        if let Some(pos) = self.list.iter().position(|x| x.nr == f.nr) {
            self.list.remove(pos);
        }
        self.list.push(f);
        self.list.len() - 1
    }

    pub fn find(&self, nr: i32) -> Option<usize> {
        self.list.iter().position(|f| f.nr == nr)
    }

    pub fn get(&self, ix: usize) -> &Filter {
        &self.list[ix]
    }

    pub fn get_mut(&mut self, ix: usize) -> &mut Filter {
        &mut self.list[ix]
    }

    pub fn last_mut(&mut self) -> Option<&mut Filter> {
        self.list.last_mut()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acronym_find() {
        let mut al = AcronymList::new();
        al.add("Low", "low case", 7);
        al.add("High", "", 9);
        assert_eq!(al.find_by_map(9), Some(1));
        assert_eq!(al.find_by_name("low"), Some(0));
        assert_eq!(al.find_by_map(1), None);
    }

    #[test]
    fn test_set_text_slot_zero() {
        let mut st = SetTextPool::new();
        assert_eq!(st.len(), 1);
        assert_eq!(st.get(0), "");
        let n = st.add("first text");
        assert_eq!(n, 1);
        assert_eq!(st.add("first text"), 1);
        assert_eq!(st.add(""), 0);
        // case matters here
        assert_eq!(st.add("First Text"), 2);
    }

    #[test]
    fn test_set_text_nodes() {
        let mut st = SetTextPool::new();
        let n = st.add("txt");
        assert!(st.set_node(n, 12));
        assert!(!st.set_node(n, 13));
        assert_eq!(st.node(n), 12);
        assert!(!st.set_node(99, 1));
    }

    #[test]
    fn test_filter_membership() {
        let mut f = Filter::new(1, 100);
        f.set_filter(2, true);
        f.set_filter(5, true);
        assert!(f.in_filter(2));
        assert!(f.in_filter(5));
        assert!(!f.in_filter(3));
        assert!(!f.in_filter(-1));
        assert!(!f.in_filter(1000));
    }

    #[test]
    fn test_filter_list_replaces() {
        let mut fl = FilterList::new();
        let mut a = Filter::new(7, 10);
        a.set_filter(1, true);
        fl.add(a);
        let b = Filter::new(7, 10);
        fl.add(b);
        let ix = fl.find(7).unwrap();
        assert!(!fl.get(ix).in_filter(1));
    }
}
