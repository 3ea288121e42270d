use num_enum::TryFromPrimitive;

// Data type byte as stored in the symbol table section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DataType {
    Set = 0,
    Parameter = 1,
    Variable = 2,
    Equation = 3,
    Alias = 4,
}

// Number of doubles carried per record, by data type. Sets carry the
// set-text index in the level field; aliases carry no data of their own.
pub const DATA_TYPE_SIZE: [usize; 5] = [1, 1, 5, 5, 0];

impl DataType {
    pub fn data_size(self) -> usize {
        DATA_TYPE_SIZE[self as usize]
    }
}

bitflags! {
    pub struct SymbolFlags: u8 {
        // some record of this set carries associated text
        const SET_TEXT = 0b0001;
        // record stream is block-compressed on disk
        const COMPRESSED = 0b0010;
        // scalar with no stored records; first read synthesizes a default
        const SCALAR_FIRST = 0b0100;
    }
}

// One entry of the symbol table.
pub struct Symbol {
    // file offset of the record stream
    pub position: i64,
    pub dim: i32,
    pub data_type: DataType,
    // variable/equation subtype, alias target index, or singleton flag
    pub user_info: i32,
    pub data_count: i32,
    pub error_count: i32,
    pub flags: SymbolFlags,
    pub expl_text: String,
    // per-dimension symbol index of the reference domain set (0 = universe)
    pub dom_symbols: Option<Vec<i32>>,
    // per-dimension 1-based index into the domain strings pool (0 = none)
    pub dom_strings: Option<Vec<i32>>,
    pub comments: Vec<String>,
    // admissible internal UEL indices, collected for 1-D sets
    pub set_bitmap: Option<Vec<bool>>,
}

impl Symbol {
    pub fn new(dim: i32, data_type: DataType, user_info: i32, expl_text: String) -> Symbol {
        Symbol {
            position: 0,
            dim,
            data_type,
            user_info,
            data_count: 0,
            error_count: 0,
            flags: SymbolFlags::empty(),
            expl_text,
            dom_symbols: None,
            dom_strings: None,
            comments: Vec::new(),
            set_bitmap: None,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags.contains(SymbolFlags::COMPRESSED)
    }

    pub fn has_set_text(&self) -> bool {
        self.flags.contains(SymbolFlags::SET_TEXT)
    }
}
