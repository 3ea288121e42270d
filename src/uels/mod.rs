use crate::intmap::IntMapping;
use crate::strhash::StrHashPool;

// Status of the internal-to-user mapping, computed lazily in one pass and
// invalidated whenever the mapping changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum MapStatus {
    Unknown,
    Unsorted,
    Sorted,
    SortGrow,
    SortFull,
}

// Two-way mapping between UEL strings and two integer namespaces: the
// dense 1-based internal index (file order) and the sparse user map.
pub struct UelTable {
    pool: StrHashPool<i32>,
    pub usr_to_ent: IntMapping,
    status: MapStatus,
}

impl UelTable {
    pub fn new() -> UelTable {
        let mut pool = StrHashPool::new();
        pool.one_based = true;
        UelTable {
            pool,
            usr_to_ent: IntMapping::new(),
            status: MapStatus::Unknown,
        }
    }

    pub fn count(&self) -> i32 {
        self.pool.count() as i32
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    fn reset_status(&mut self) {
        self.status = MapStatus::Unknown;
    }

    // Internal index, or a fresh one; user map starts unassigned.
    pub fn add(&mut self, s: &str) -> i32 {
        self.pool.add(s, -1)
    }

    // Unconditional append during load; the on-disk order is authoritative.
    pub fn store(&mut self, s: &str) -> i32 {
        self.pool.store(s, -1)
    }

    pub fn index_of(&mut self, s: &str) -> i32 {
        self.pool.index_of(s)
    }

    pub fn get(&self, n: i32) -> &str {
        self.pool.get_string(n)
    }

    pub fn get_user_map(&self, n: i32) -> i32 {
        *self.pool.get_obj(n)
    }

    pub fn set_user_map(&mut self, en: i32, user: i32) {
        self.pool.set_obj(en, user);
        self.usr_to_ent.set_mapping(user, en);
        self.reset_status();
    }

    pub fn user_to_internal(&self, user: i32) -> i32 {
        self.usr_to_ent.get_mapping(user)
    }

    // Assign the next free user value to an internal entry; an existing
    // assignment is returned unchanged.
    pub fn new_usr_uel(&mut self, en: i32) -> i32 {
        let mut res = *self.pool.get_obj(en);
        if res < 0 {
            res = self.usr_to_ent.highest_index() + 1;
            self.pool.set_obj(en, res);
            self.usr_to_ent.set_mapping(res, en);
        }
        self.reset_status();
        res
    }

    // Register a string in user space, auto-assigning the next user value
    // for a fresh or unmapped entry; returns the user value.
    pub fn add_usr_new(&mut self, s: &str) -> i32 {
        let en = self.pool.add(s, -1);
        let mut res = *self.pool.get_obj(en);
        if res < 0 {
            res = self.usr_to_ent.highest_index() + 1;
            self.pool.set_obj(en, res);
            self.usr_to_ent.set_mapping(res, en);
        }
        self.reset_status();
        res
    }

    // Register a string under a specific user value; -1 flags a conflict
    // with an existing different assignment.
    pub fn add_usr_indx_new(&mut self, s: &str, user: i32) -> i32 {
        let en = self.pool.add(s, -1);
        let res = *self.pool.get_obj(en);
        let res = if res < 0 {
            self.pool.set_obj(en, user);
            self.usr_to_ent.set_mapping(user, en);
            user
        } else if res != user {
            -1
        } else {
            res
        };
        self.reset_status();
        res
    }

    pub fn rename(&mut self, n: i32, s: &str) {
        self.pool.rename(n, s);
    }

    pub fn max_uel_length(&self) -> i32 {
        let mut res = 0;
        for n in 1..=self.count() {
            res = res.max(self.pool.get_string(n).len() as i32);
        }
        res
    }

    // One pass over the user maps: sort_full means user == internal for
    // every entry, sort_grow means the assigned maps grow with the
    // internal order but some entries are unassigned.
    pub fn map_status(&mut self) -> MapStatus {
        if self.status == MapStatus::Unknown {
            let mut lv = -1;
            let mut complete = true;
            self.status = MapStatus::SortGrow;
            for n in 1..=self.count() {
                let v = self.get_user_map(n);
                if v < 0 {
                    complete = false;
                } else if v > lv {
                    lv = v;
                    if !complete {
                        self.status = MapStatus::Sorted;
                    }
                } else {
                    self.status = MapStatus::Unsorted;
                    break;
                }
            }
            if self.status == MapStatus::SortGrow && complete {
                self.status = MapStatus::SortFull;
            }
        }
        self.status
    }

    pub fn memory_used(&self) -> usize {
        self.pool.memory_used() + self.usr_to_ent.memory_used()
    }
}
