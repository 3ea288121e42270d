use std::convert::TryFrom;

use log::{debug, trace};

use crate::data::TupleStore;
use crate::errors::*;
use crate::headers::*;
use crate::intmap::IntMapping;
use crate::stream::GdxStream;
use crate::strhash::StrHashPool;
use crate::symbols::{DataType, Symbol, SymbolFlags};
use crate::tables::{AcronymList, Filter, FilterList, SetTextPool};
use crate::uels::{MapStatus, UelTable};
use crate::values::*;

// Producer system identifier written into every file header.
const AUDIT_LINE: &str = "GDX Library      07.0.0 5g1b0a2e Aug  1, 2026 (GDX) x86 64bit/Linux";

// Dimension limit of format versions before 149; files of version <= 6
// encode their last-dimension delta against it.
const MAX_DIM_V148: i32 = 10;

// The error list keeps this many records at most; later ones are dropped.
const MAX_STORED_ERRORS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    NotOpen,
    ReadInit,
    WriteInit,
    WriteDomRaw,
    WriteDomMap,
    WriteDomStr,
    WriteRaw,
    WriteMap,
    WriteStr,
    RegisterRaw,
    RegisterMap,
    RegisterStr,
    ReadRaw,
    ReadMap,
    ReadMapR,
    ReadStr,
    RegisterFilter,
    ReadSlice,
}

impl FileMode {
    pub fn label(self) -> &'static str {
        match self {
            FileMode::NotOpen => "FileNotOpen",
            FileMode::ReadInit => "ReadCommand",
            FileMode::WriteInit => "WriteCommand",
            FileMode::WriteDomRaw => "Write-Dom-Raw",
            FileMode::WriteDomMap => "Write-Dom-Map",
            FileMode::WriteDomStr => "Write-Dom-Str",
            FileMode::WriteRaw => "Write-Raw",
            FileMode::WriteMap => "Write-Map",
            FileMode::WriteStr => "Write-Str",
            FileMode::RegisterRaw => "Regis-Raw",
            FileMode::RegisterMap => "Regis-Map",
            FileMode::RegisterStr => "Regis-Str",
            FileMode::ReadRaw => "Read-Raw",
            FileMode::ReadMap => "Read-Map",
            FileMode::ReadMapR => "Read-MapR",
            FileMode::ReadStr => "Read-Str",
            FileMode::RegisterFilter => "Regis-Filter",
            FileMode::ReadSlice => "Read-Slice",
        }
    }
}

const ANY_WRITE_MODE: &[FileMode] = &[
    FileMode::WriteInit,
    FileMode::WriteDomRaw,
    FileMode::WriteDomMap,
    FileMode::WriteDomStr,
    FileMode::WriteRaw,
    FileMode::WriteMap,
    FileMode::WriteStr,
];

const ANY_READ_MODE: &[FileMode] = &[
    FileMode::ReadInit,
    FileMode::ReadRaw,
    FileMode::ReadMap,
    FileMode::ReadMapR,
    FileMode::ReadStr,
    FileMode::ReadSlice,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileStatus {
    NotOpen,
    ReadMode,
    WriteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DomainAction {
    Unmapped,
    Expand,
    Strict,
    Filtered,
}

#[derive(Clone, Copy)]
struct DomainEntry {
    action: DomainAction,
    filter_ix: usize,
}

impl Default for DomainEntry {
    fn default() -> DomainEntry {
        DomainEntry {
            action: DomainAction::Unmapped,
            filter_ix: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElemWidth {
    Byte,
    Word,
    Integer,
}

// Narrowest integer width that encodes n distinct values.
fn integer_width(n: i32) -> ElemWidth {
    if n <= 0 {
        ElemWidth::Integer
    } else if n <= 255 {
        ElemWidth::Byte
    } else if n <= 65535 {
        ElemWidth::Word
    } else {
        ElemWidth::Integer
    }
}

fn access_bitmap(bm: &[bool], ix: i32) -> bool {
    ix >= 0 && (ix as usize) < bm.len() && bm[ix as usize]
}

fn env_compress_flag() -> i32 {
    match std::env::var("GDXCOMPRESS") {
        Ok(s) => match s.trim().to_ascii_uppercase().chars().next() {
            None | Some('N') | Some('0') => 0,
            _ => 1,
        },
        Err(_) => 0,
    }
}

// The GDX container engine. One handle owns one open file together with
// its UEL table, symbol table, set texts, acronyms, filters and the
// per-symbol read/write cursor state; the mode field is the state machine
// every API call is checked against.
pub struct GdxFile {
    stream: Option<GdxStream>,
    mode: FileMode,
    mode_after_reg: FileMode,
    status: FileStatus,

    compress_out: bool,
    do_uncompress: bool,
    compr_lev: i32,
    version_read: i32,
    file_system_id: String,
    producer: String,
    producer2: String,
    major_index_position: u64,
    next_write_position: u64,

    symbols: StrHashPool<Symbol>,
    uels: UelTable,
    set_texts: Option<SetTextPool>,
    acronyms: AcronymList,
    filters: FilterList,
    domain_strs: Vec<String>,
    map_set_text: Vec<i32>,

    sort_list: Option<TupleStore>,
    error_list: TupleStore,
    cur_sym: i32,
    cur_dim: usize,
    data_size: usize,
    data_count: i32,
    delta_for_write: i32,
    delta_for_read: i32,
    last_elem: [i32; MAX_INDEX_DIM],
    prev_elem: [i32; MAX_INDEX_DIM],
    min_elem: [i32; MAX_INDEX_DIM],
    max_elem: [i32; MAX_INDEX_DIM],
    elem_width: [ElemWidth; MAX_INDEX_DIM],
    last_str_elem: Vec<Option<String>>,
    wr_bitmaps: Vec<Option<Vec<bool>>>,
    domain_list: [DomainEntry; MAX_INDEX_DIM],

    read_universe: bool,
    universe_nr: i32,
    uel_cnt_orig: i32,
    nr_mapped_added: i32,
    cur_filter_ix: Option<usize>,

    slice_indxs: Vec<IntMapping>,
    slice_rev_map: Vec<IntMapping>,
    slice_elems: Vec<String>,
    slice_synr: i32,

    value_map: ValueMap,
    read_value_map: ValueMap,
    value_map_i64: [i64; Vm::COUNT],
    zvalacr: f64,
    next_auto_acronym: i32,

    last_error: i32,
    last_rep_error: i32,
    err_cnt: i32,
    err_cnt_total: i32,
    maj_context: &'static str,

    store_domain_sets: bool,
}

impl Default for GdxFile {
    fn default() -> GdxFile {
        GdxFile::new()
    }
}

impl GdxFile {
    pub fn new() -> GdxFile {
        let mut symbols = StrHashPool::new();
        symbols.one_based = true;
        let mut g = GdxFile {
            stream: None,
            mode: FileMode::NotOpen,
            mode_after_reg: FileMode::NotOpen,
            status: FileStatus::NotOpen,
            compress_out: false,
            do_uncompress: false,
            compr_lev: 0,
            version_read: 0,
            file_system_id: String::new(),
            producer: String::new(),
            producer2: String::new(),
            major_index_position: 0,
            next_write_position: 0,
            symbols,
            uels: UelTable::new(),
            set_texts: None,
            acronyms: AcronymList::new(),
            filters: FilterList::new(),
            domain_strs: Vec::new(),
            map_set_text: Vec::new(),
            sort_list: None,
            error_list: TupleStore::new(MAX_INDEX_DIM, VAL_COUNT),
            cur_sym: 0,
            cur_dim: 0,
            data_size: 0,
            data_count: 0,
            delta_for_write: 0,
            delta_for_read: 0,
            last_elem: [0; MAX_INDEX_DIM],
            prev_elem: [0; MAX_INDEX_DIM],
            min_elem: [0; MAX_INDEX_DIM],
            max_elem: [0; MAX_INDEX_DIM],
            elem_width: [ElemWidth::Integer; MAX_INDEX_DIM],
            last_str_elem: Vec::new(),
            wr_bitmaps: Vec::new(),
            domain_list: [DomainEntry::default(); MAX_INDEX_DIM],
            read_universe: false,
            universe_nr: 0,
            uel_cnt_orig: 0,
            nr_mapped_added: 0,
            cur_filter_ix: None,
            slice_indxs: Vec::new(),
            slice_rev_map: Vec::new(),
            slice_elems: Vec::new(),
            slice_synr: 0,
            value_map: default_value_map(),
            read_value_map: default_value_map(),
            value_map_i64: [0; Vm::COUNT],
            zvalacr: ACRONYM_SCALE,
            next_auto_acronym: 0,
            last_error: ERR_NOERROR,
            last_rep_error: ERR_NOERROR,
            err_cnt: 0,
            err_cnt_total: 0,
            maj_context: "",
            store_domain_sets: true,
        };
        g.last_str_elem.resize_with(MAX_INDEX_DIM, || None);
        g.wr_bitmaps.resize_with(MAX_INDEX_DIM, || None);
        g.slice_indxs.resize_with(MAX_INDEX_DIM, IntMapping::new);
        g.slice_rev_map.resize_with(MAX_INDEX_DIM, IntMapping::new);
        g.slice_elems.resize(MAX_INDEX_DIM, String::new());
        g.reset_special_values();
        g
    }

    // ---- stream shorthands -------------------------------------------------

    fn w_byte(&mut self, v: u8) {
        if let Some(s) = self.stream.as_mut() {
            s.write_byte(v);
        }
    }

    fn w_int(&mut self, v: i32) {
        if let Some(s) = self.stream.as_mut() {
            s.write_integer(v);
        }
    }

    fn w_i64(&mut self, v: i64) {
        if let Some(s) = self.stream.as_mut() {
            s.write_int64(v);
        }
    }

    fn w_dbl(&mut self, v: f64) {
        if let Some(s) = self.stream.as_mut() {
            s.write_double(v);
        }
    }

    fn w_str(&mut self, v: &str) {
        if let Some(s) = self.stream.as_mut() {
            s.write_string(v);
        }
    }

    fn r_byte(&mut self) -> u8 {
        self.stream.as_mut().map(|s| s.read_byte()).unwrap_or(0)
    }

    fn r_word(&mut self) -> u16 {
        self.stream.as_mut().map(|s| s.read_word()).unwrap_or(0)
    }

    fn r_int(&mut self) -> i32 {
        self.stream.as_mut().map(|s| s.read_integer()).unwrap_or(0)
    }

    fn r_i64(&mut self) -> i64 {
        self.stream.as_mut().map(|s| s.read_int64()).unwrap_or(0)
    }

    fn r_dbl(&mut self) -> f64 {
        self.stream.as_mut().map(|s| s.read_double()).unwrap_or(0.0)
    }

    fn r_str(&mut self) -> String {
        self.stream.as_mut().map(|s| s.read_string()).unwrap_or_default()
    }

    fn fpos(&mut self) -> u64 {
        self.stream.as_mut().map(|s| s.position()).unwrap_or(0)
    }

    fn fseek(&mut self, p: u64) {
        if let Some(s) = self.stream.as_mut() {
            s.set_position(p);
        }
    }

    fn fcompress(&mut self, on: bool) {
        if let Some(s) = self.stream.as_mut() {
            s.set_compression(on);
        }
    }

    fn io_error_pending(&self) -> bool {
        self.stream.as_ref().map(|s| s.io_error_pending()).unwrap_or(false)
    }

    // ---- error bookkeeping -------------------------------------------------

    fn init_errors(&mut self) {
        self.err_cnt = 0;
        self.err_cnt_total = 0;
        self.last_error = ERR_NOERROR;
        self.last_rep_error = ERR_NOERROR;
    }

    fn set_error(&mut self, n: i32) {
        if n == ERR_NOERROR {
            return;
        }
        if self.last_error == ERR_NOERROR {
            self.last_error = n;
        }
        self.err_cnt += 1;
        self.err_cnt_total += 1;
    }

    fn report_error(&mut self, n: i32) {
        if n != self.last_rep_error {
            trace!("error after call to {}: {} ({})", self.maj_context, n, error_text(n));
        }
        self.set_error(n);
        self.last_rep_error = n;
    }

    // true when the condition failed; the error has been recorded.
    fn error_condition(&mut self, cond: bool, n: i32) -> bool {
        if !cond {
            self.report_error(n);
        }
        !cond
    }

    fn check_mode(&mut self, routine: &'static str, allowed: &[FileMode]) -> bool {
        if allowed.is_empty() || allowed.contains(&self.mode) {
            trace!("{}", routine);
            return true;
        }
        self.set_error(ERR_BADMODE);
        debug!(
            "{} called out of context; current context = {}",
            routine,
            self.mode.label()
        );
        false
    }

    fn major_check_mode(&mut self, routine: &'static str, allowed: &[FileMode]) -> bool {
        self.maj_context = routine;
        self.last_rep_error = ERR_NOERROR;
        self.check_mode(routine, allowed)
    }

    // ---- special values ----------------------------------------------------

    pub fn reset_special_values(&mut self) -> bool {
        self.value_map = default_value_map();
        self.read_value_map = self.value_map;
        for k in 0..Vm::COUNT {
            self.value_map_i64[k] = dbl_to_i64(self.value_map[k]);
        }
        self.zvalacr = ACRONYM_SCALE;
        true
    }

    pub fn get_special_values(&self, avals: &mut [f64; Sv::COUNT]) -> bool {
        avals[Sv::UNDEF] = self.value_map[Vm::UNDEF as usize];
        avals[Sv::NA] = self.value_map[Vm::NA as usize];
        avals[Sv::PINF] = self.value_map[Vm::PINF as usize];
        avals[Sv::MINF] = self.value_map[Vm::MINF as usize];
        avals[Sv::EPS] = self.value_map[Vm::EPS as usize];
        avals[Sv::NORMAL] = 0.0;
        avals[Sv::ACRONYM] = self.zvalacr;
        true
    }

    // The five patterns must be distinct under bit comparison.
    pub fn set_special_values(&mut self, avals: &[f64; Sv::COUNT]) -> bool {
        let mut tmp = self.value_map;
        tmp[Vm::UNDEF as usize] = avals[Sv::UNDEF];
        tmp[Vm::NA as usize] = avals[Sv::NA];
        tmp[Vm::PINF as usize] = avals[Sv::PINF];
        tmp[Vm::MINF as usize] = avals[Sv::MINF];
        tmp[Vm::EPS as usize] = avals[Sv::EPS];

        let mut tmp64 = [0i64; Vm::COUNT];
        for k in 0..Vm::COUNT {
            tmp64[k] = dbl_to_i64(tmp[k]);
        }
        for iv1 in Vm::UNDEF as usize..=Vm::EPS as usize {
            for iv2 in iv1 + 1..=Vm::EPS as usize {
                if tmp64[iv1] == tmp64[iv2] {
                    self.report_error(ERR_DUPLICATESPECVAL);
                    return false;
                }
            }
        }
        self.value_map = tmp;
        self.read_value_map = tmp;
        self.value_map_i64 = tmp64;
        true
    }

    // Read-side remap only; the values need not be unique.
    pub fn set_read_special_values(&mut self, avals: &[f64; Sv::COUNT]) -> bool {
        self.read_value_map[Vm::UNDEF as usize] = avals[Sv::UNDEF];
        self.read_value_map[Vm::NA as usize] = avals[Sv::NA];
        self.read_value_map[Vm::PINF as usize] = avals[Sv::PINF];
        self.read_value_map[Vm::MINF as usize] = avals[Sv::MINF];
        self.read_value_map[Vm::EPS as usize] = avals[Sv::EPS];
        true
    }

    // Classify a value against the configured special patterns.
    pub fn map_value(&self, d: f64) -> (bool, usize) {
        let i64v = dbl_to_i64(d);
        if i64v == self.value_map_i64[Vm::UNDEF as usize] {
            (true, Sv::UNDEF)
        } else if i64v == self.value_map_i64[Vm::NA as usize] {
            (true, Sv::NA)
        } else if i64v == self.value_map_i64[Vm::PINF as usize] {
            (true, Sv::PINF)
        } else if i64v == self.value_map_i64[Vm::MINF as usize] {
            (true, Sv::MINF)
        } else if i64v == self.value_map_i64[Vm::EPS as usize] {
            (true, Sv::EPS)
        } else {
            (false, Sv::NORMAL)
        }
    }

    // ---- open for writing --------------------------------------------------

    // Uses the GDXCOMPRESS environment variable for the compression flag.
    pub fn open_write(&mut self, file_name: &str, producer: &str) -> bool {
        self.open_write_ex(file_name, producer, env_compress_flag())
    }

    pub fn open_write_ex(&mut self, file_name: &str, producer: &str, compr: i32) -> bool {
        if self.mode != FileMode::NotOpen {
            self.last_error = ERR_FILEALREADYOPEN;
            return false;
        }
        if file_name.is_empty() {
            self.last_error = ERR_NOFILE;
            return false;
        }
        let stream = match GdxStream::create(file_name) {
            Ok(s) => s,
            Err(e) => {
                self.last_error = e.code();
                return false;
            }
        };
        self.stream = Some(stream);

        let compr = if self.stream.as_ref().map(|s| s.can_compress()).unwrap_or(false) {
            compr
        } else {
            0
        };
        self.compr_lev = compr;
        self.compress_out = compr > 0;

        self.maj_context = "OpenWrite";
        self.init_errors();
        let mut symbols = StrHashPool::new();
        symbols.one_based = true;
        self.symbols = symbols;
        self.uels = UelTable::new();
        self.acronyms.clear();
        self.filters.clear();
        self.domain_strs.clear();
        self.map_set_text.clear();
        self.version_read = VERSION;
        self.file_system_id = AUDIT_LINE.to_string();
        self.producer = producer.to_string();
        self.producer2.clear();

        self.w_byte(GDX_HEADER_NR);
        self.w_str(GDX_HEADER_ID);
        self.w_int(VERSION);
        self.w_int(compr);
        let fsi = self.file_system_id.clone();
        self.w_str(&fsi);
        let prod = self.producer.clone();
        self.w_str(&prod);
        // Reserve some space for positions
        self.major_index_position = self.fpos();
        for _ in 0..INDEX_SLOTS {
            self.w_i64(0);
        }
        self.set_texts = Some(SetTextPool::new());
        self.reset_special_values();
        self.next_write_position = self.fpos();
        self.mode = FileMode::WriteInit;
        self.status = FileStatus::WriteMode;
        true
    }

    // ---- symbol writing ----------------------------------------------------

    fn is_good_new_symbol(&mut self, s: &str) -> bool {
        let fresh = self.symbols.index_of(s) < 1;
        if self.error_condition(fresh, ERR_DUPLICATESYMBOL) {
            return false;
        }
        let no_acronym = self.acronyms.find_by_name(s).is_none();
        if self.error_condition(no_acronym, ERR_DUPLICATESYMBOL) {
            return false;
        }
        !self.error_condition(is_good_ident(s), ERR_BADIDENTFORMAT)
    }

    fn prepare_symbol_write(
        &mut self,
        caller: &'static str,
        name: &str,
        text: &str,
        dim: i32,
        typ: DataType,
        user_info: i32,
    ) -> bool {
        self.cur_sym = 0;
        self.error_list.clear();
        self.sort_list = None;

        if !self.major_check_mode(caller, &[FileMode::WriteInit]) {
            return false;
        }
        if !self.is_good_new_symbol(name) {
            return false;
        }
        if self.error_condition(dim >= 0 && dim <= MAX_INDEX_DIM as i32, ERR_BADDIMENSION)
            || self.error_condition(typ != DataType::Alias, ERR_BADDATATYPE)
        {
            return false;
        }

        let mut sym = Symbol::new(dim, typ, user_info, make_good_expl_text(text));
        if self.compress_out && dim > 0 {
            sym.flags.insert(SymbolFlags::COMPRESSED);
        }
        if typ == DataType::Set && dim == 1 && self.store_domain_sets {
            sym.set_bitmap = Some(Vec::new());
        }
        let compressed = sym.is_compressed();
        self.cur_sym = self.symbols.add(name, sym);

        self.cur_dim = dim as usize;
        // B = 0..dim encodes the first changed dimension, B = dim+1..254 a
        // change in the last dimension only, 255 ends the stream.
        self.delta_for_write = 255 - self.cur_dim as i32 - 1;
        self.data_size = typ.data_size();
        for d in 0..self.cur_dim {
            self.last_elem[d] = INDEX_INITIAL;
            self.min_elem[d] = std::i32::MAX;
            self.max_elem[d] = 0;
            self.wr_bitmaps[d] = None;
        }
        self.fcompress(compressed);
        true
    }

    pub fn data_write_raw_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dim: i32,
        typ: DataType,
        user_info: i32,
    ) -> bool {
        if !self.prepare_symbol_write("DataWriteRawStart", name, expl_text, dim, typ, user_info) {
            return false;
        }
        // no assumptions about the range of a uel
        for d in 0..self.cur_dim {
            self.min_elem[d] = 0;
            self.max_elem[d] = std::i32::MAX;
        }
        self.init_do_write(-1);
        self.mode = FileMode::WriteDomRaw;
        true
    }

    pub fn data_write_map_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dim: i32,
        typ: DataType,
        user_info: i32,
    ) -> bool {
        if !self.prepare_symbol_write("DataWriteMapStart", name, expl_text, dim, typ, user_info) {
            return false;
        }
        self.sort_list = Some(TupleStore::new(self.cur_dim, self.data_size));
        self.mode = FileMode::WriteDomMap;
        true
    }

    pub fn data_write_str_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dim: i32,
        typ: DataType,
        user_info: i32,
    ) -> bool {
        if !self.prepare_symbol_write("DataWriteStrStart", name, expl_text, dim, typ, user_info) {
            return false;
        }
        for d in 0..MAX_INDEX_DIM {
            self.last_str_elem[d] = None;
        }
        self.sort_list = Some(TupleStore::new(self.cur_dim, self.data_size));
        self.mode = FileMode::WriteDomStr;
        true
    }

    // Define the domain of the symbol whose write just started. Each
    // identifier must resolve to a one dimensional set (or *); records
    // violating a registered domain go to the error list.
    pub fn symbol_set_domain(&mut self, domain_ids: &[&str]) -> bool {
        let allowed = &[FileMode::WriteDomRaw, FileMode::WriteDomMap, FileMode::WriteDomStr];
        if !self.major_check_mode("SymbolSetDomain", allowed) || self.cur_sym == 0 {
            return false;
        }
        let mut res = true;
        let dim = self.cur_dim;
        let mut dom_symbols = vec![0i32; dim];
        for d in 0..dim {
            let mut domap = true;
            let mut dom_sy;
            if domain_ids[d] == "*" {
                dom_sy = 0;
            } else {
                dom_sy = self.symbols.index_of(domain_ids[d]);
                if dom_sy <= 0 {
                    self.report_error(ERR_UNKNOWNDOMAIN);
                    dom_sy = -1;
                    res = false;
                }
            }
            let mut synr = dom_sy;
            if dom_sy > 0 {
                loop {
                    let (dt, ui) = {
                        let obj = self.symbols.get_obj(synr);
                        (obj.data_type, obj.user_info)
                    };
                    if dt == DataType::Set {
                        break;
                    }
                    if dt == DataType::Alias {
                        synr = ui;
                        if synr > 0 {
                            continue;
                        }
                        domap = false;
                        break;
                    }
                    self.report_error(ERR_ALIASSETEXPECTED);
                    res = false;
                    dom_sy = 0;
                    break;
                }
            }
            dom_symbols[d] = dom_sy;
            if domap && dom_sy > 0 {
                // a set may be its own domain
                if dim != 1 || dom_sy != self.cur_sym {
                    self.wr_bitmaps[d] = self.symbols.get_obj(synr).set_bitmap.clone();
                }
            }
        }
        self.symbols.get_obj_mut(self.cur_sym).dom_symbols = Some(dom_symbols);
        self.mode = match self.mode {
            FileMode::WriteDomRaw => FileMode::WriteRaw,
            FileMode::WriteDomMap => FileMode::WriteMap,
            FileMode::WriteDomStr => FileMode::WriteStr,
            m => m,
        };
        res
    }

    // Relaxed domain information: free-form strings, no checking, can be
    // set during or after the write of the symbol.
    pub fn symbol_set_domain_x(&mut self, synr: i32, domain_ids: &[&str]) -> bool {
        if self.error_condition(synr >= 1 && synr <= self.symbols.count() as i32, ERR_BADSYMBOLINDEX) {
            return false;
        }
        let dim = self.symbols.get_obj(synr).dim as usize;
        if dim == 0 {
            return true;
        }
        let mut dom_strings = vec![0i32; dim];
        for d in 0..dim {
            let s = domain_ids[d];
            if s.is_empty() || s == "*" || !is_good_ident(s) {
                dom_strings[d] = 0;
            } else {
                let pos = self
                    .domain_strs
                    .iter()
                    .position(|x| x.eq_ignore_ascii_case(s));
                dom_strings[d] = match pos {
                    Some(p) => p as i32 + 1,
                    None => {
                        self.domain_strs.push(s.to_string());
                        self.domain_strs.len() as i32
                    }
                };
            }
        }
        self.symbols.get_obj_mut(synr).dom_strings = Some(dom_strings);
        true
    }

    // Raw mode requires strictly sorted input on the internal index space.
    pub fn data_write_raw(&mut self, keys: &[i32], values: &[f64]) -> bool {
        if self.mode == FileMode::WriteDomRaw {
            self.mode = FileMode::WriteRaw;
        }
        if self.mode != FileMode::WriteRaw && !self.check_mode("DataWriteRaw", &[FileMode::WriteRaw]) {
            return false;
        }
        self.do_write(keys, values)
    }

    pub fn data_write_map(&mut self, keys: &[i32], values: &[f64]) -> bool {
        if self.mode == FileMode::WriteDomMap {
            self.mode = FileMode::WriteMap;
        }
        if self.mode != FileMode::WriteMap && !self.check_mode("DataWriteMap", &[FileMode::WriteMap]) {
            return false;
        }
        let mut mapped = [0i32; MAX_INDEX_DIM];
        for d in 0..self.cur_dim {
            let kd = self.uels.user_to_internal(keys[d]);
            if kd < 0 {
                self.report_error(ERR_BADELEMENTINDEX);
                return false;
            }
            mapped[d] = kd;
            if kd < self.min_elem[d] {
                self.min_elem[d] = kd;
            }
            if kd > self.max_elem[d] {
                self.max_elem[d] = kd;
            }
        }
        match self.sort_list.as_mut() {
            Some(sl) => {
                sl.add(&mapped, values);
                true
            }
            None => false,
        }
    }

    // String elements are added to the UEL table as they appear; they do
    // not enter the user mapped space.
    pub fn data_write_str(&mut self, keys: &[&str], values: &[f64]) -> bool {
        if self.mode == FileMode::WriteDomStr {
            self.mode = FileMode::WriteStr;
        }
        if self.mode != FileMode::WriteStr && !self.check_mode("DataWriteStr", &[FileMode::WriteStr]) {
            return false;
        }
        for d in 0..self.cur_dim {
            let sv = keys[d].trim_end();
            let changed = match self.last_str_elem[d] {
                Some(ref last) => last != sv,
                None => true,
            };
            if changed {
                let mut kd = self.uels.index_of(sv);
                if kd < 0 {
                    if self.error_condition(is_good_uel_string(sv), ERR_BADUELSTR) {
                        return false;
                    }
                    kd = self.uels.add(sv);
                }
                self.last_elem[d] = kd;
                self.last_str_elem[d] = Some(sv.to_string());
                if kd < self.min_elem[d] {
                    self.min_elem[d] = kd;
                }
                if kd > self.max_elem[d] {
                    self.max_elem[d] = kd;
                }
            }
        }
        let last_elem = self.last_elem;
        match self.sort_list.as_mut() {
            Some(sl) => {
                sl.add(&last_elem, values);
                true
            }
            None => false,
        }
    }

    // Sorts and flushes buffered records (map/str modes), terminates the
    // record stream and finalizes the symbol's counters.
    pub fn data_write_done(&mut self) -> bool {
        let allowed = &[
            FileMode::WriteRaw,
            FileMode::WriteMap,
            FileMode::WriteStr,
            FileMode::WriteDomRaw,
            FileMode::WriteDomMap,
            FileMode::WriteDomStr,
        ];
        if !self.major_check_mode("DataWriteDone", allowed) {
            return false;
        }
        if self.mode != FileMode::WriteRaw && self.mode != FileMode::WriteDomRaw {
            if let Some(mut sl) = self.sort_list.take() {
                sl.sort();
                self.init_do_write(sl.count() as i32);
                sl.start_read();
                let mut keys = [0i32; MAX_INDEX_DIM];
                let mut vals = [0.0f64; VAL_COUNT];
                while sl.next_record(&mut keys, &mut vals) {
                    self.do_write(&keys, &vals);
                }
            }
        }
        self.w_byte(255); // end of data
        self.next_write_position = self.fpos();
        let data_count = self.data_count;
        let err_cnt = self.err_cnt;
        if self.cur_sym > 0 {
            let sym = self.symbols.get_obj_mut(self.cur_sym);
            sym.data_count = data_count; // reflects dupes
            sym.error_count = err_cnt;
        }
        self.err_cnt = 0;
        self.mode = FileMode::WriteInit;
        self.fcompress(false);
        self.cur_sym = 0;
        true
    }

    fn init_do_write(&mut self, nr_recs: i32) {
        self.data_count = 0;
        let pos = self.next_write_position;
        self.fseek(pos);
        if self.cur_sym > 0 {
            self.symbols.get_obj_mut(self.cur_sym).position = pos as i64;
        }
        self.w_str(MARK_DATA);
        self.w_byte(self.cur_dim as u8);
        self.w_int(nr_recs); // ignores dupes in count
        for d in 0..self.cur_dim {
            self.last_elem[d] = INDEX_INITIAL;
            self.elem_width[d] = integer_width(self.max_elem[d].wrapping_sub(self.min_elem[d]).wrapping_add(1));
            let mn = self.min_elem[d];
            let mx = self.max_elem[d];
            self.w_int(mn);
            self.w_int(mx);
        }
    }

    fn do_write(&mut self, keys: &[i32], vals: &[f64]) -> bool {
        // domain checking against the write bitmaps
        let mut viol_dim = None;
        for d in 0..self.cur_dim {
            if let Some(ref bm) = self.wr_bitmaps[d] {
                if !access_bitmap(bm, keys[d]) {
                    viol_dim = Some(d);
                    break;
                }
            }
        }
        if let Some(dv) = viol_dim {
            self.report_error(ERR_DOMAINVIOLATION);
            let mut err_uels = [0i32; MAX_INDEX_DIM];
            for d in 0..dv {
                err_uels[d] = keys[d];
            }
            err_uels[dv] = -keys[dv];
            for d in dv + 1..self.cur_dim {
                let neg = match self.wr_bitmaps[d] {
                    Some(ref bm) => !access_bitmap(bm, keys[d]),
                    None => false,
                };
                err_uels[d] = if neg { -keys[d] } else { keys[d] };
            }
            self.add_to_error_list_dom_errs(&err_uels, vals);
            return false;
        }

        let mut fdim = self.cur_dim as i32 + 1;
        let mut delta = 0;
        for d in 0..self.cur_dim {
            delta = keys[d] - self.last_elem[d];
            if delta != 0 {
                fdim = d as i32 + 1;
                break;
            }
        }
        if fdim > self.cur_dim as i32 {
            if self.cur_dim > 0 && self.data_count >= 1 {
                self.report_error(ERR_DATADUPLICATE);
                self.add_to_error_list(keys, vals);
                return false;
            }
            self.w_byte(1); // keeps the logic working for scalars
        } else {
            if delta < 0 {
                self.report_error(ERR_RAWNOTSORTED);
                self.add_to_error_list(keys, vals);
                return false;
            }
            if fdim == self.cur_dim as i32 && delta <= self.delta_for_write {
                // small change in the last dimension
                self.w_byte((self.cur_dim as i32 + delta) as u8);
                self.last_elem[self.cur_dim - 1] = keys[self.cur_dim - 1];
            } else {
                // general change
                self.w_byte(fdim as u8);
                for d in fdim as usize - 1..self.cur_dim {
                    let v = keys[d] - self.min_elem[d];
                    match self.elem_width[d] {
                        ElemWidth::Integer => self.w_int(v),
                        ElemWidth::Word => {
                            if let Some(s) = self.stream.as_mut() {
                                s.write_word(v as u16);
                            }
                        }
                        ElemWidth::Byte => self.w_byte(v as u8),
                    }
                    self.last_elem[d] = keys[d];
                }
            }
        }
        if self.data_size > 0 {
            for dv in 0..self.data_size {
                let x = vals[dv];
                let (class, i64v) = dbl_info(x);
                let mut xv = Vm::UNDEF;
                while xv < Vm::NORMAL {
                    if i64v == self.value_map_i64[xv as usize] {
                        break;
                    }
                    xv += 1;
                }
                if xv == Vm::NORMAL && class != DblClass::Finite {
                    xv = match class {
                        DblClass::NInf => Vm::MINF,
                        DblClass::PInf => Vm::PINF,
                        DblClass::Nan => Vm::NA,
                        DblClass::Finite => xv,
                    };
                }
                self.w_byte(xv);
                if xv == Vm::NORMAL {
                    self.w_dbl(x);
                    if x >= self.zvalacr {
                        let code = (x / self.zvalacr).round() as i32;
                        if self.acronyms.find_by_map(code).is_none() {
                            self.acronyms.add("", "", code);
                        }
                    }
                }
            }
        }
        self.data_count += 1;
        let key0 = if self.cur_dim > 0 { keys[0] } else { 0 };
        let level = if self.data_size > 0 { vals[VAL_LEVEL] } else { 0.0 };
        if self.cur_sym > 0 {
            let dim = self.cur_dim;
            let sym = self.symbols.get_obj_mut(self.cur_sym);
            if sym.data_type == DataType::Set || sym.data_type == DataType::Alias {
                if level != 0.0 {
                    sym.flags.insert(SymbolFlags::SET_TEXT);
                }
                if dim == 1 {
                    if let Some(ref mut bm) = sym.set_bitmap {
                        if bm.len() <= key0 as usize {
                            bm.resize(key0 as usize + 1, false);
                        }
                        bm[key0 as usize] = true;
                    }
                }
            }
        }
        true
    }

    fn add_to_error_list(&mut self, keys: &[i32], vals: &[f64]) {
        if self.error_list.count() >= MAX_STORED_ERRORS {
            return;
        }
        let mut k = [0i32; MAX_INDEX_DIM];
        k[..self.cur_dim].copy_from_slice(&keys[..self.cur_dim]);
        let mut v = [0.0f64; VAL_COUNT];
        v[..self.data_size.min(vals.len())].copy_from_slice(&vals[..self.data_size.min(vals.len())]);
        self.error_list.add_unique(&k, &v);
    }

    // A domain-error record is only kept when no stored record already
    // flags the same negated key in the same dimension.
    fn add_to_error_list_dom_errs(&mut self, keys: &[i32], vals: &[f64]) {
        if self.error_list.count() >= MAX_STORED_ERRORS {
            return;
        }
        let mut tmp = [0i32; MAX_INDEX_DIM];
        let mut tv = [0.0f64; VAL_COUNT];
        for d in 0..self.cur_dim {
            let en = keys[d];
            if en < 0 {
                for n in 0..self.error_list.count() {
                    self.error_list.get_record(n, &mut tmp, &mut tv);
                    if tmp[d] == en {
                        return;
                    }
                }
            }
        }
        let mut k = [0i32; MAX_INDEX_DIM];
        k[..self.cur_dim].copy_from_slice(&keys[..self.cur_dim]);
        let mut v = [0.0f64; VAL_COUNT];
        v[..self.data_size.min(vals.len())].copy_from_slice(&vals[..self.data_size.min(vals.len())]);
        self.error_list.add_unique(&k, &v);
    }

    // ---- close -------------------------------------------------------------

    // Close the file; pending writes are finished, the ancillary sections
    // are emitted and the header offset slots are back-patched. Returns
    // the last error code, zero when clean.
    pub fn close(&mut self) -> i32 {
        if self.mode == FileMode::WriteRaw
            || self.mode == FileMode::WriteMap
            || self.mode == FileMode::WriteStr
        {
            self.data_write_done();
        }
        if self.mode == FileMode::WriteInit {
            self.write_trailer_sections();
        }

        let res = match self.stream.as_mut() {
            Some(s) => {
                s.flush_all();
                s.last_io_result()
            }
            None => 1,
        };

        self.stream = None;
        let mut symbols = StrHashPool::new();
        symbols.one_based = true;
        self.symbols = symbols;
        self.set_texts = None;
        self.uels = UelTable::new();
        self.sort_list = None;
        self.domain_strs.clear();
        self.error_list.clear();
        self.filters.clear();
        self.acronyms.clear();
        self.map_set_text.clear();
        self.mode = FileMode::NotOpen;
        self.status = FileStatus::NotOpen;
        res
    }

    fn write_trailer_sections(&mut self) {
        self.fcompress(self.compress_out);
        let pos = self.next_write_position;
        self.fseek(pos);
        let symb_pos = pos;
        self.w_str(MARK_SYMB);
        let sy_count = self.symbols.count();
        self.w_int(sy_count as i32);
        for n in 1..=sy_count as i32 {
            let name = self.symbols.get_string(n).to_string();
            let (position, dim, data_type, user_info, data_count, error_count, set_text, expl, compressed, dom_symbols, comments) = {
                let sym = self.symbols.get_obj(n);
                (
                    sym.position,
                    sym.dim,
                    sym.data_type,
                    sym.user_info,
                    sym.data_count,
                    sym.error_count,
                    sym.has_set_text(),
                    sym.expl_text.clone(),
                    sym.is_compressed(),
                    sym.dom_symbols.clone(),
                    sym.comments.clone(),
                )
            };
            self.w_str(&name);
            self.w_i64(position);
            self.w_int(dim);
            self.w_byte(data_type as u8);
            self.w_int(user_info);
            self.w_int(data_count);
            self.w_int(error_count);
            self.w_byte(set_text as u8);
            self.w_str(&expl);
            self.w_byte(compressed as u8);
            match dom_symbols {
                Some(doms) => {
                    self.w_byte(1);
                    for v in doms {
                        self.w_int(v);
                    }
                }
                None => self.w_byte(0),
            }
            self.w_int(comments.len() as i32);
            for c in comments {
                self.w_str(&c);
            }
        }
        self.w_str(MARK_SYMB);

        let set_text_pos = self.fpos();
        self.fcompress(self.compress_out);
        self.w_str(MARK_SETT);
        let st_count = self.set_texts.as_ref().map(|p| p.len()).unwrap_or(0);
        self.w_int(st_count as i32);
        for n in 0..st_count as i32 {
            let s = match self.set_texts.as_ref() {
                Some(p) => p.get(n).to_string(),
                None => String::new(),
            };
            self.w_str(&s);
        }
        self.w_str(MARK_SETT);

        let uel_pos = self.fpos();
        self.fcompress(self.compress_out);
        self.w_str(MARK_UEL);
        let uel_count = self.uels.count();
        self.w_int(uel_count);
        for n in 1..=uel_count {
            let s = self.uels.get(n).to_string();
            self.w_str(&s);
        }
        self.w_str(MARK_UEL);

        let acronym_pos = self.fpos();
        self.fcompress(self.compress_out);
        self.w_str(MARK_ACRO);
        self.w_int(self.acronyms.len() as i32);
        for n in 0..self.acronyms.len() {
            let (name, text, map) = {
                let a = self.acronyms.get(n);
                let name = if a.name.is_empty() {
                    format!("UnknownACRO{}", a.map)
                } else {
                    a.name.clone()
                };
                (name, a.text.clone(), a.map)
            };
            self.w_str(&name);
            self.w_str(&text);
            self.w_int(map);
        }
        self.w_str(MARK_ACRO);

        let dom_str_pos = self.fpos();
        self.fcompress(self.compress_out);
        self.w_str(MARK_DOMS);
        self.w_int(self.domain_strs.len() as i32);
        for n in 0..self.domain_strs.len() {
            let s = self.domain_strs[n].clone();
            self.w_str(&s);
        }
        self.w_str(MARK_DOMS);
        for n in 1..=sy_count as i32 {
            let dom_strings = self.symbols.get_obj(n).dom_strings.clone();
            if let Some(ds) = dom_strings {
                self.w_int(n);
                for v in ds {
                    self.w_int(v);
                }
            }
        }
        self.w_int(-1);
        self.w_str(MARK_DOMS);

        // This must be at the very end
        let index_pos = self.major_index_position;
        self.fseek(index_pos);
        self.fcompress(false);
        self.w_int(MARK_BOI);
        let offsets = [
            symb_pos as i64,
            uel_pos as i64,
            set_text_pos as i64,
            acronym_pos as i64,
            self.next_write_position as i64,
            dom_str_pos as i64,
        ];
        for off in offsets.iter() {
            self.w_i64(*off);
        }
    }

    // ---- open for reading --------------------------------------------------

    pub fn open_read(&mut self, file_name: &str) -> bool {
        self.open_read_xx(file_name, 0, false)
    }

    // The read-mode bitmap skips loading sections; bit 0 set skips the
    // set-text section.
    pub fn open_read_ex(&mut self, file_name: &str, read_mode: i32) -> bool {
        self.open_read_xx(file_name, read_mode, false)
    }

    // Append: read the whole file, then switch to write mode positioned
    // at the stored next-write-position. Only format version 7 supports
    // this; replacing an existing symbol stays forbidden.
    pub fn open_append(&mut self, file_name: &str, producer: &str) -> bool {
        self.producer2 = producer.to_string();
        if !self.open_read_xx(file_name, 0, true) {
            return false;
        }
        if self.version_read < VERSION {
            self.report_error(ERR_FILETOOLDFORAPPEND);
            self.close();
            return false;
        }
        self.mode = FileMode::WriteInit;
        self.status = FileStatus::WriteMode;
        let pos = self.next_write_position;
        self.fseek(pos);
        self.compress_out = self.do_uncompress;
        true
    }

    fn open_read_xx(&mut self, file_name: &str, read_mode: i32, for_append: bool) -> bool {
        if self.mode != FileMode::NotOpen {
            self.last_error = ERR_FILEALREADYOPEN;
            return false;
        }
        self.maj_context = "OpenRead";
        self.init_errors();
        if file_name.is_empty() {
            self.last_error = ERR_NOFILE;
            return false;
        }
        let open_res = if for_append {
            GdxStream::open_read_write(file_name)
        } else {
            GdxStream::open_read(file_name)
        };
        let mut fs = match open_res {
            Ok(s) => s,
            Err(e) => {
                self.last_error = e.code();
                return false;
            }
        };
        if !fs.good_byte_order() {
            self.last_error = ERR_BADDATAFORMAT;
            return false;
        }
        if self.error_condition(fs.read_byte() == GDX_HEADER_NR, ERR_OPEN_FILEHEADER) {
            return false;
        }
        let id = fs.read_string();
        if self.error_condition(id.eq_ignore_ascii_case(GDX_HEADER_ID), ERR_OPEN_FILEMARKER) {
            return false;
        }
        self.version_read = fs.read_integer();
        if self.error_condition(self.version_read <= VERSION, ERR_OPEN_FILEVERSION) {
            return false;
        }
        let compr = if self.version_read <= 5 { 0 } else { fs.read_integer() };
        self.do_uncompress = compr > 0;
        self.compr_lev = compr;
        self.file_system_id = fs.read_string();
        self.producer = fs.read_string();
        if !for_append {
            self.producer2.clear();
        }

        self.major_index_position = fs.position();
        if self.error_condition(fs.read_integer() == MARK_BOI, ERR_OPEN_BOI) {
            return false;
        }
        let symb_pos: i64;
        let uel_pos: i64;
        let set_text_pos: i64;
        let mut acronym_pos: i64 = 0;
        let mut dom_str_pos: i64 = 0;
        if self.version_read <= 5 {
            symb_pos = fs.read_integer() as i64;
            uel_pos = fs.read_integer() as i64;
            set_text_pos = fs.read_integer() as i64;
            self.next_write_position = fs.read_integer() as u64;
        } else {
            symb_pos = fs.read_int64();
            uel_pos = fs.read_int64();
            set_text_pos = fs.read_int64();
            if self.version_read >= 7 {
                acronym_pos = fs.read_int64();
                self.next_write_position = fs.read_int64() as u64;
                dom_str_pos = fs.read_int64();
            }
        }

        // symbol table
        fs.set_compression(self.do_uncompress);
        fs.set_position(symb_pos as u64);
        if self.error_condition(fs.read_string() == MARK_SYMB, ERR_OPEN_SYMBOLMARKER1) {
            return false;
        }
        let sy_count = fs.read_integer();
        let mut symbols = StrHashPool::new();
        symbols.one_based = true;
        self.acronyms.clear();
        self.filters.clear();
        for _ in 0..sy_count {
            let name = fs.read_string();
            let position = if self.version_read <= 5 {
                fs.read_integer() as i64
            } else {
                fs.read_int64()
            };
            let dim = fs.read_integer();
            let type_byte = fs.read_byte();
            let data_type = match DataType::try_from(type_byte) {
                Ok(t) => t,
                Err(_) => {
                    self.report_error(ERR_BADDATAFORMAT);
                    return false;
                }
            };
            let user_info = fs.read_integer();
            let data_count = fs.read_integer();
            let error_count = fs.read_integer();
            let set_text = fs.read_byte() != 0;
            let expl_text = fs.read_string();
            let compressed = self.version_read > 5 && fs.read_byte() != 0;
            let mut sym = Symbol::new(dim, data_type, user_info, expl_text);
            sym.position = position;
            sym.data_count = data_count;
            sym.error_count = error_count;
            if set_text {
                sym.flags.insert(SymbolFlags::SET_TEXT);
            }
            if compressed {
                sym.flags.insert(SymbolFlags::COMPRESSED);
            }
            if self.version_read >= 7 {
                if fs.read_byte() != 0 {
                    let mut doms = vec![0i32; dim.max(0) as usize];
                    for v in doms.iter_mut() {
                        *v = fs.read_integer();
                    }
                    sym.dom_symbols = Some(doms);
                }
                let mut comm_cnt = fs.read_integer();
                while comm_cnt > 0 {
                    sym.comments.push(fs.read_string());
                    comm_cnt -= 1;
                }
            }
            symbols.store(&name, sym);
        }
        if self.error_condition(fs.read_string() == MARK_SYMB, ERR_OPEN_SYMBOLMARKER2) {
            return false;
        }
        self.symbols = symbols;

        // UEL table
        fs.set_compression(self.do_uncompress);
        fs.set_position(uel_pos as u64);
        self.uels = UelTable::new();
        if self.error_condition(fs.read_string() == MARK_UEL, ERR_OPEN_UELMARKER1) {
            return false;
        }
        let mut uel_count = fs.read_integer();
        // producers stamped 2001 stored one count too many
        if self.file_system_id.get(15..19) == Some("2001") {
            uel_count -= 1;
        }
        while self.uels.count() < uel_count {
            let s = fs.read_string();
            self.uels.store(&s);
        }
        self.uel_cnt_orig = self.uels.count();
        if self.error_condition(fs.read_string() == MARK_UEL, ERR_OPEN_UELMARKER2) {
            return false;
        }

        // set texts
        self.map_set_text.clear();
        self.set_texts = None;
        if read_mode % 2 == 0 {
            fs.set_compression(self.do_uncompress);
            fs.set_position(set_text_pos as u64);
            if self.error_condition(fs.read_string() == MARK_SETT, ERR_OPEN_TEXTMARKER1) {
                return false;
            }
            let st_count = fs.read_integer();
            let mut pool = SetTextPool::new();
            for n in 0..st_count {
                let s = fs.read_string();
                let tn = if n == 0 { 0 } else { pool.add(&s) };
                // duplicates collapse; remap set-record levels on read
                if self.map_set_text.is_empty() && tn != n {
                    self.map_set_text = (0..n).collect();
                }
                if !self.map_set_text.is_empty() {
                    self.map_set_text.push(tn);
                }
            }
            if self.error_condition(fs.read_string() == MARK_SETT, ERR_OPEN_TEXTMARKER2) {
                return false;
            }
            self.set_texts = Some(pool);
        }

        // acronyms
        if self.version_read >= 7 {
            fs.set_compression(self.do_uncompress);
            fs.set_position(acronym_pos as u64);
            if self.error_condition(fs.read_string() == MARK_ACRO, ERR_OPEN_ACROMARKER1) {
                return false;
            }
            let acro_count = fs.read_integer();
            for _ in 0..acro_count {
                let name = fs.read_string();
                let text = fs.read_string();
                let map = fs.read_integer();
                self.acronyms.add(&name, &text, map);
            }
            if self.error_condition(fs.read_string() == MARK_ACRO, ERR_OPEN_ACROMARKER2) {
                return false;
            }
        }

        // domain strings
        self.domain_strs.clear();
        if self.version_read >= 7 && dom_str_pos != 0 {
            fs.set_compression(self.do_uncompress);
            fs.set_position(dom_str_pos as u64);
            if self.error_condition(fs.read_string() == MARK_DOMS, ERR_OPEN_DOMSMARKER1) {
                return false;
            }
            let ds_count = fs.read_integer();
            for _ in 0..ds_count {
                self.domain_strs.push(fs.read_string());
            }
            if self.error_condition(fs.read_string() == MARK_DOMS, ERR_OPEN_DOMSMARKER2) {
                return false;
            }
            loop {
                let synr = fs.read_integer();
                if synr <= 0 {
                    break;
                }
                if synr > self.symbols.count() as i32 {
                    self.report_error(ERR_BADDATAFORMAT);
                    return false;
                }
                let dim = self.symbols.get_obj(synr).dim.max(0) as usize;
                let mut ds = vec![0i32; dim];
                for v in ds.iter_mut() {
                    *v = fs.read_integer();
                }
                self.symbols.get_obj_mut(synr).dom_strings = Some(ds);
            }
            if self.error_condition(fs.read_string() == MARK_DOMS, ERR_OPEN_DOMSMARKER3) {
                return false;
            }
        }

        if fs.io_error_pending() {
            self.last_error = fs.last_io_result();
            return false;
        }

        self.last_error = ERR_NOERROR;
        self.reset_special_values();
        fs.set_compression(false);
        self.stream = Some(fs);
        self.mode = FileMode::ReadInit;
        self.status = FileStatus::ReadMode;
        true
    }

    // ---- record reading ----------------------------------------------------

    fn result_will_be_sorted(&mut self, domain_nrs: &[i32]) -> bool {
        for d in 0..self.cur_dim {
            match domain_nrs[d] {
                DOMC_UNMAPPED => continue,
                DOMC_EXPAND => {
                    let st = self.uels.map_status();
                    if st == MapStatus::Unsorted {
                        return false;
                    }
                    if d == 0 {
                        if st >= MapStatus::SortGrow {
                            continue;
                        }
                        return false;
                    } else if st == MapStatus::SortFull {
                        continue;
                    }
                    return false;
                }
                DOMC_STRICT => {
                    if self.uels.map_status() == MapStatus::Unsorted {
                        return false;
                    }
                }
                nr => {
                    if self.uels.map_status() >= MapStatus::Sorted {
                        continue;
                    }
                    match self.filters.find(nr) {
                        Some(ix) => {
                            if !self.filters.get(ix).sorted {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
            }
        }
        true
    }

    fn prepare_symbol_read(
        &mut self,
        caller: &'static str,
        synr: i32,
        domain_nrs: &[i32],
        newmode: FileMode,
    ) -> i32 {
        if matches!(
            self.mode,
            FileMode::ReadStr | FileMode::ReadMap | FileMode::ReadMapR | FileMode::ReadRaw
        ) {
            self.data_read_done();
        }
        self.nr_mapped_added = 0;
        self.error_list.clear();
        self.cur_sym = 0;
        self.sort_list = None;

        if !self.major_check_mode(caller, &[FileMode::ReadInit]) {
            self.mode = FileMode::ReadInit;
            return -1;
        }
        self.read_universe = synr == 0;
        let mut synr = synr;
        if !self.read_universe {
            if self.error_condition(synr >= 1 && synr <= self.symbols.count() as i32, ERR_BADSYMBOLINDEX) {
                return -1;
            }
            // follow alias chains to the underlying set; the hop counter
            // catches cycles in a damaged symbol table
            let mut hops = 0;
            loop {
                let (dt, ui) = {
                    let sym = self.symbols.get_obj(synr);
                    (sym.data_type, sym.user_info)
                };
                if dt != DataType::Alias {
                    break;
                }
                synr = ui;
                if synr == 0 {
                    self.read_universe = true;
                    break;
                }
                hops += 1;
                if synr < 1 || synr > self.symbols.count() as i32 || hops > self.symbols.count() {
                    self.report_error(ERR_BADSYMBOLINDEX);
                    return -1;
                }
            }
        }

        let nr_recs;
        if self.read_universe {
            self.cur_dim = 1;
            self.data_size = DataType::Set.data_size();
            nr_recs = self.uel_cnt_orig;
            self.universe_nr = 0;
            self.cur_sym = 0;
            self.last_elem[0] = -1;
            self.prev_elem[0] = -1;
        } else {
            self.cur_sym = synr;
            let (dim, compressed, position, count, size) = {
                let sym = self.symbols.get_obj(synr);
                (
                    sym.dim as usize,
                    sym.is_compressed(),
                    sym.position,
                    sym.data_count,
                    sym.data_type.data_size(),
                )
            };
            self.cur_dim = dim;
            self.fcompress(compressed);
            self.fseek(position as u64);
            self.data_size = size;
            nr_recs = count;
        }
        self.delta_for_read = if self.version_read <= 6 {
            MAX_DIM_V148
        } else {
            self.cur_dim as i32
        };

        for d in 0..self.cur_dim {
            let entry = match domain_nrs[d] {
                DOMC_UNMAPPED => DomainEntry {
                    action: DomainAction::Unmapped,
                    filter_ix: 0,
                },
                DOMC_EXPAND => DomainEntry {
                    action: DomainAction::Expand,
                    filter_ix: 0,
                },
                DOMC_STRICT => DomainEntry {
                    action: DomainAction::Strict,
                    filter_ix: 0,
                },
                nr => match self.filters.find(nr) {
                    Some(ix) => DomainEntry {
                        action: DomainAction::Filtered,
                        filter_ix: ix,
                    },
                    None => {
                        self.report_error(ERR_UNKNOWNFILTER);
                        return -1;
                    }
                },
            };
            self.domain_list[d] = entry;
        }

        if !self.read_universe {
            let mark = self.r_str();
            if self.error_condition(mark == MARK_DATA, ERR_BADDATAMARKER_DATA) {
                return -1;
            }
            let dim_byte = self.r_byte();
            if self.error_condition(dim_byte as usize == self.cur_dim, ERR_BADDATAMARKER_DIM) {
                return -1;
            }
            self.r_int(); // skip record counter
        }

        if self.cur_dim == 0 && nr_recs == 0 {
            if self.cur_sym > 0 {
                self.symbols
                    .get_obj_mut(self.cur_sym)
                    .flags
                    .insert(SymbolFlags::SCALAR_FIRST);
            }
            self.mode = newmode;
            return 1;
        }

        if !self.read_universe {
            if self.cur_sym > 0 {
                self.symbols
                    .get_obj_mut(self.cur_sym)
                    .flags
                    .remove(SymbolFlags::SCALAR_FIRST);
            }
            for d in 0..self.cur_dim {
                self.last_elem[d] = INDEX_INITIAL;
                self.prev_elem[d] = -1;
                self.min_elem[d] = self.r_int();
                self.max_elem[d] = self.r_int();
                self.elem_width[d] =
                    integer_width(self.max_elem[d].wrapping_sub(self.min_elem[d]).wrapping_add(1));
            }
        }

        let mut newmode = newmode;
        let res;
        if matches!(newmode, FileMode::ReadRaw | FileMode::ReadStr | FileMode::ReadSlice) {
            res = nr_recs;
        } else if self.result_will_be_sorted(domain_nrs) {
            res = nr_recs;
            newmode = FileMode::ReadMapR;
        } else {
            // read everything, remap, and re-sort in memory
            let mut sl = TupleStore::new(self.cur_dim, self.data_size);
            let mut expnd = IntMapping::new();
            let mut avals = [0.0f64; VAL_COUNT];
            let mut aelements = [0i32; MAX_INDEX_DIM];
            let mut afdim = 0i32;
            let mut fidim = self.cur_dim as i32;
            let mut add_new = false;
            loop {
                if !self.do_read(&mut avals, &mut afdim) {
                    break;
                }
                if fidim < afdim {
                    afdim = fidim;
                }
                fidim = self.cur_dim as i32;
                let mut add_error = false;
                for d in (afdim as usize).max(1) - 1..self.cur_dim {
                    if self.last_elem[d] < 0 {
                        self.report_error(ERR_BADELEMENTINDEX);
                        self.sort_list = None;
                        self.mode = FileMode::ReadInit;
                        return -1;
                    }
                    match self.domain_list[d].action {
                        DomainAction::Unmapped => aelements[d] = self.last_elem[d],
                        DomainAction::Filtered => {
                            let v = self.uels.get_user_map(self.last_elem[d]);
                            let filt = self.filters.get(self.domain_list[d].filter_ix);
                            if filt.in_filter(v) {
                                aelements[d] = v;
                            } else if !add_error {
                                add_error = true;
                                fidim = d as i32;
                            }
                        }
                        DomainAction::Strict => {
                            let v = self.uels.get_user_map(self.last_elem[d]);
                            if v >= 0 {
                                aelements[d] = v;
                            } else if !add_error {
                                add_error = true;
                                fidim = d as i32;
                            }
                        }
                        DomainAction::Expand => {
                            let en = self.last_elem[d];
                            let v = expnd.get_mapping(en);
                            if v >= 0 {
                                aelements[d] = v;
                            } else {
                                let v = self.uels.get_user_map(en);
                                if v >= 0 {
                                    aelements[d] = v;
                                    expnd.set_mapping(en, v);
                                } else {
                                    aelements[d] = -en; // same nr gets the same mapping
                                    add_new = true;
                                }
                            }
                        }
                    }
                }
                if add_error {
                    let fd = fidim as usize;
                    self.last_elem[fd] = -self.last_elem[fd];
                    let marked = self.last_elem;
                    self.add_to_error_list_dom_errs(&marked, &avals);
                    self.last_elem[fd] = -self.last_elem[fd];
                    continue;
                }
                if add_new {
                    for d in 0..self.cur_dim {
                        let en = aelements[d];
                        if en < 0 {
                            let v = self.uels.new_usr_uel(-en);
                            aelements[d] = v;
                            expnd.set_mapping(-en, v);
                            self.nr_mapped_added += 1;
                            // the same element may repeat in later positions
                            for d2 in d + 1..self.cur_dim {
                                if aelements[d2] == en {
                                    aelements[d2] = v;
                                }
                            }
                        }
                    }
                    add_new = false;
                }
                sl.add(&aelements, &avals);
            }
            sl.sort();
            sl.start_read();
            res = sl.count() as i32;
            self.sort_list = Some(sl);
        }

        for d in 0..self.cur_dim {
            self.last_elem[d] = -1;
        }
        self.mode = newmode;
        res
    }

    // Decode the next record off the stream into last_elem and vals.
    fn do_read(&mut self, vals: &mut [f64], afdim: &mut i32) -> bool {
        if self.read_universe {
            self.universe_nr += 1;
            let res = self.universe_nr <= self.uel_cnt_orig;
            if res {
                self.last_elem[0] = self.universe_nr;
                vals[VAL_LEVEL] = 0.0;
                *afdim = 1;
            }
            return res;
        }
        if self.cur_sym > 0 && self.symbols.get_obj(self.cur_sym).flags.contains(SymbolFlags::SCALAR_FIRST) {
            self.symbols
                .get_obj_mut(self.cur_sym)
                .flags
                .remove(SymbolFlags::SCALAR_FIRST);
            self.get_default_record(vals);
            *afdim = 0;
            return true;
        }

        let b = self.r_byte();
        if self.io_error_pending() {
            return false;
        }
        if b as i32 > self.delta_for_read {
            // relative change in the last dimension
            if b == 255 {
                return false;
            }
            *afdim = self.cur_dim as i32;
            if self.cur_dim > 0 {
                self.last_elem[self.cur_dim - 1] += b as i32 - self.delta_for_read;
            }
        } else {
            if b == 0 {
                self.report_error(ERR_BADDATAFORMAT);
                return false;
            }
            *afdim = b as i32;
            for d in b as usize - 1..self.cur_dim {
                match self.elem_width[d] {
                    ElemWidth::Integer => self.last_elem[d] = self.r_int() + self.min_elem[d],
                    ElemWidth::Word => self.last_elem[d] = self.r_word() as i32 + self.min_elem[d],
                    ElemWidth::Byte => self.last_elem[d] = self.r_byte() as i32 + self.min_elem[d],
                }
            }
        }
        if self.data_size > 0 {
            for dv in 0..self.data_size {
                let bsv = self.r_byte();
                if bsv as usize >= Vm::COUNT {
                    self.report_error(ERR_BADDATAFORMAT);
                    return false;
                }
                vals[dv] = if bsv != Vm::NORMAL {
                    self.read_value_map[bsv as usize]
                } else {
                    let x = self.r_dbl();
                    if x >= self.zvalacr {
                        self.acronym_remap(x)
                    } else {
                        x
                    }
                };
            }
            if !self.map_set_text.is_empty() && vals[VAL_LEVEL] != 0.0 && self.cur_sym > 0 {
                if self.symbols.get_obj(self.cur_sym).data_type == DataType::Set {
                    // remap the set-text number
                    let x = vals[VAL_LEVEL];
                    let d = x.round() as i64;
                    if (x - d as f64).abs() < 1e-12 && d >= 0 && (d as usize) < self.map_set_text.len() {
                        vals[VAL_LEVEL] = self.map_set_text[d as usize] as f64;
                    }
                }
            }
        }
        true
    }

    fn acronym_remap(&mut self, v: f64) -> f64 {
        if v < self.zvalacr {
            return v;
        }
        if v.is_nan() {
            return self.read_value_map[Vm::NA as usize];
        }
        if v.is_infinite() {
            return v;
        }
        if v < 0.0 {
            return v;
        }
        let org = (v / self.zvalacr).round() as i32;
        let new_ix = match self.acronyms.find_by_map(org) {
            None => {
                if self.next_auto_acronym <= 0 {
                    org
                } else {
                    let ni = self.next_auto_acronym;
                    self.next_auto_acronym += 1;
                    let pos = self.acronyms.add("", "", org);
                    let a = self.acronyms.get_mut(pos);
                    a.read_map = ni;
                    a.auto_gen = true;
                    ni
                }
            }
            Some(pos) => {
                let cur = self.acronyms.get(pos).read_map;
                if cur > 0 {
                    cur
                } else if self.next_auto_acronym <= 0 {
                    org
                } else {
                    let ni = self.next_auto_acronym;
                    self.next_auto_acronym += 1;
                    let a = self.acronyms.get_mut(pos);
                    a.read_map = ni;
                    a.auto_gen = true;
                    ni
                }
            }
        };
        self.zvalacr * new_ix as f64
    }

    fn get_default_record(&self, vals: &mut [f64]) {
        for v in vals.iter_mut() {
            *v = 0.0;
        }
        if self.cur_sym == 0 {
            return;
        }
        let sym = self.symbols.get_obj(self.cur_sym);
        match sym.data_type {
            DataType::Set | DataType::Alias | DataType::Parameter => {
                vals[VAL_LEVEL] = 0.0;
            }
            DataType::Variable => {
                let ui = sym.user_info;
                let ix = if ui >= VARTYPE_UNKNOWN && ui < VARTYPE_COUNT as i32 {
                    ui as usize
                } else {
                    VARTYPE_UNKNOWN as usize
                };
                vals[..VAL_COUNT].copy_from_slice(&DEF_REC_VAR[ix]);
            }
            DataType::Equation => {
                let ui = sym.user_info - EQU_USERINFO_BASE;
                let ix = if ui >= 0 && ui < EQUTYPE_COUNT as i32 {
                    ui as usize
                } else {
                    EQUTYPE_E as usize
                };
                vals[..VAL_COUNT].copy_from_slice(&DEF_REC_EQU[ix]);
            }
        }
    }

    pub fn data_read_raw_start(&mut self, synr: i32) -> Option<i32> {
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        let n = self.prepare_symbol_read("DataReadRawStart", synr, &doms, FileMode::ReadRaw);
        if n >= 0 {
            Some(n)
        } else {
            None
        }
    }

    pub fn data_read_str_start(&mut self, synr: i32) -> Option<i32> {
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        let n = self.prepare_symbol_read("DataReadStrStart", synr, &doms, FileMode::ReadStr);
        if n >= 0 {
            Some(n)
        } else {
            None
        }
    }

    pub fn data_read_map_start(&mut self, synr: i32) -> Option<i32> {
        let doms = [DOMC_STRICT; MAX_INDEX_DIM];
        let n = self.prepare_symbol_read("DataReadMapStart", synr, &doms, FileMode::ReadMap);
        if n >= 0 {
            Some(n)
        } else {
            None
        }
    }

    // Per-dimension actions: unmapped, expand, strict or a filter number.
    pub fn data_read_filtered_start(&mut self, synr: i32, filter_action: &[i32]) -> Option<i32> {
        let mut doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        doms[..filter_action.len()].copy_from_slice(filter_action);
        let n = self.prepare_symbol_read("DataReadStartFiltered", synr, &doms, FileMode::ReadMap);
        if n >= 0 {
            Some(n)
        } else {
            None
        }
    }

    // Next record in raw mode; returns the first changed dimension.
    pub fn data_read_raw(&mut self, keys: &mut [i32], values: &mut [f64]) -> Option<i32> {
        if self.mode != FileMode::ReadRaw && !self.check_mode("DataReadRaw", &[FileMode::ReadRaw]) {
            return None;
        }
        let mut afdim = 0;
        if !self.do_read(values, &mut afdim) {
            self.data_read_done();
            return None;
        }
        keys[..self.cur_dim].copy_from_slice(&self.last_elem[..self.cur_dim]);
        Some(afdim)
    }

    pub fn data_read_str(&mut self, keys: &mut [String], values: &mut [f64]) -> Option<i32> {
        if self.mode != FileMode::ReadStr && !self.check_mode("DataReadStr", &[FileMode::ReadStr]) {
            return None;
        }
        let mut afdim = 0;
        if !self.do_read(values, &mut afdim) {
            self.data_read_done();
            return None;
        }
        for d in 0..self.cur_dim {
            let led = self.last_elem[d];
            keys[d] = if led >= 1 && led <= self.uels.count() {
                self.uels.get(led).to_string()
            } else {
                format!("{}{}", BAD_UEL_PREFIX, led)
            };
        }
        Some(afdim)
    }

    pub fn data_read_map(&mut self, _recnr: i32, keys: &mut [i32], values: &mut [f64]) -> Option<i32> {
        let allowed = &[FileMode::ReadMap, FileMode::ReadMapR];
        if !allowed.contains(&self.mode) && !self.check_mode("DataReadMap", allowed) {
            return None;
        }
        if self.cur_sym > 0
            && self
                .symbols
                .get_obj(self.cur_sym)
                .flags
                .contains(SymbolFlags::SCALAR_FIRST)
        {
            self.symbols
                .get_obj_mut(self.cur_sym)
                .flags
                .remove(SymbolFlags::SCALAR_FIRST);
            self.get_default_record(values);
            return Some(0);
        }
        if self.mode == FileMode::ReadMap {
            let got = match self.sort_list.as_mut() {
                Some(sl) => sl.next_record(keys, values),
                None => false,
            };
            if !got {
                return None;
            }
            let mut dim_frst = 0;
            for d in 0..self.cur_dim {
                if keys[d] != self.prev_elem[d] {
                    self.prev_elem[d] = keys[d];
                    if dim_frst == 0 {
                        dim_frst = d as i32 + 1;
                    }
                }
            }
            return Some(dim_frst);
        }

        // fast path: the remapped result is already in user order
        let mut fidim = self.cur_dim as i32;
        loop {
            let mut dim_frst = 0;
            if !self.do_read(values, &mut dim_frst) {
                return None;
            }
            if fidim < dim_frst {
                dim_frst = fidim;
            }
            fidim = self.cur_dim as i32;
            let mut add_error = false;
            let mut add_new = false;
            if dim_frst > 0 {
                for d in dim_frst as usize - 1..self.cur_dim {
                    if self.last_elem[d] < 0 {
                        self.report_error(ERR_BADELEMENTINDEX);
                        return None;
                    }
                    match self.domain_list[d].action {
                        DomainAction::Unmapped => keys[d] = self.last_elem[d],
                        DomainAction::Filtered => {
                            let v = self.uels.get_user_map(self.last_elem[d]);
                            let filt = self.filters.get(self.domain_list[d].filter_ix);
                            if filt.in_filter(v) {
                                keys[d] = v;
                            } else {
                                add_error = true;
                                fidim = d as i32 + 1;
                                break;
                            }
                        }
                        DomainAction::Strict => {
                            let v = self.uels.get_user_map(self.last_elem[d]);
                            if v >= 0 {
                                keys[d] = v;
                            } else {
                                add_error = true;
                                fidim = d as i32 + 1;
                                break;
                            }
                        }
                        DomainAction::Expand => {
                            let en = self.last_elem[d];
                            let v = self.uels.get_user_map(en);
                            if v >= 0 {
                                keys[d] = v;
                            } else {
                                keys[d] = -en;
                                add_new = true;
                            }
                        }
                    }
                }
            }
            if add_error {
                for d in 0..self.cur_dim {
                    if self.last_elem[d] < 0 {
                        self.report_error(ERR_BADELEMENTINDEX);
                        return None;
                    }
                    match self.domain_list[d].action {
                        DomainAction::Filtered => {
                            let v = self.uels.get_user_map(self.last_elem[d]);
                            let filt = self.filters.get(self.domain_list[d].filter_ix);
                            if !filt.in_filter(v) {
                                self.last_elem[d] = -self.last_elem[d];
                            }
                        }
                        DomainAction::Strict => {
                            let v = self.uels.get_user_map(self.last_elem[d]);
                            if v < 0 {
                                self.last_elem[d] = -self.last_elem[d];
                            }
                        }
                        _ => {}
                    }
                }
                let marked = self.last_elem;
                self.add_to_error_list_dom_errs(&marked, values);
                for d in 0..self.cur_dim {
                    if self.last_elem[d] < 0 {
                        self.last_elem[d] = -self.last_elem[d];
                    }
                }
                continue;
            }
            if add_new {
                for d in 0..self.cur_dim {
                    let en = keys[d];
                    if en < 0 {
                        let v = self.uels.new_usr_uel(-en);
                        keys[d] = v;
                        self.nr_mapped_added += 1;
                        for d2 in d + 1..self.cur_dim {
                            if keys[d2] == en {
                                keys[d2] = v;
                            }
                        }
                    }
                }
            }
            // with filtering we lost track of the first changed dimension
            let mut dim_frst = 0;
            for d in 0..self.cur_dim {
                if self.prev_elem[d] != keys[d] {
                    self.prev_elem[d] = keys[d];
                    if dim_frst == 0 {
                        dim_frst = d as i32 + 1;
                    }
                }
            }
            return Some(dim_frst);
        }
    }

    pub fn data_read_done(&mut self) -> bool {
        let allowed = &[
            FileMode::ReadInit,
            FileMode::ReadRaw,
            FileMode::ReadMap,
            FileMode::ReadMapR,
            FileMode::ReadStr,
            FileMode::ReadSlice,
        ];
        self.sort_list = None;
        self.cur_sym = 0;
        if !self.major_check_mode("DataReadDone", allowed) {
            self.mode = FileMode::ReadInit;
            return false;
        }
        if self.mode == FileMode::ReadSlice {
            for d in 0..MAX_INDEX_DIM {
                self.slice_indxs[d].clear();
                self.slice_rev_map[d].clear();
            }
        }
        self.nr_mapped_added = 0;
        self.mode = FileMode::ReadInit;
        true
    }

    // Raw read through a callback; useful for bulk copies.
    pub fn data_read_raw_fast(&mut self, synr: i32, dp: &mut dyn FnMut(&[i32], &[f64])) -> Option<i32> {
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        let nr_recs = self.prepare_symbol_read("DataReadRawFast", synr, &doms, FileMode::ReadRaw);
        if nr_recs < 0 {
            return None;
        }
        let mut avals = [0.0f64; VAL_COUNT];
        let mut afdim = 0;
        while self.do_read(&mut avals, &mut afdim) {
            dp(&self.last_elem[..self.cur_dim], &avals);
        }
        self.data_read_done();
        Some(nr_recs)
    }

    // Raw read with some index positions fixed by strings; only matching
    // records reach the callback.
    pub fn data_read_raw_fast_filt(
        &mut self,
        synr: i32,
        uel_filter: &[&str],
        dp: &mut dyn FnMut(&[i32], &[f64]),
    ) -> bool {
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        let nr_recs = self.prepare_symbol_read("DataReadRawFastFilt", synr, &doms, FileMode::ReadRaw);
        let mut res = false;
        if nr_recs >= 0 {
            let mut good = true;
            let mut elem_dims = Vec::new();
            for d in 0..self.cur_dim {
                if !uel_filter[d].is_empty() {
                    let nr = self.uels.index_of(uel_filter[d]);
                    if nr < 0 {
                        good = false;
                        break;
                    }
                    elem_dims.push((d, nr));
                }
            }
            if good {
                let mut avals = [0.0f64; VAL_COUNT];
                let mut afdim = 0;
                while self.do_read(&mut avals, &mut afdim) {
                    let hit = elem_dims.iter().all(|&(d, nr)| self.last_elem[d] == nr);
                    if hit {
                        dp(&self.last_elem[..self.cur_dim], &avals);
                    }
                }
                res = true;
            }
        }
        self.data_read_done();
        res
    }

    // Tally the distinct UELs of one index position; filter misses go to
    // the error list, hits are optionally reported in user order.
    pub fn get_domain_elements(
        &mut self,
        synr: i32,
        dim_pos: i32,
        filter_nr: i32,
        mut dp: Option<&mut dyn FnMut(i32, i32)>,
    ) -> Option<i32> {
        if self.error_condition(synr >= 1 && synr <= self.symbols.count() as i32, ERR_BADSYMBOLINDEX) {
            return None;
        }
        let dim = self.symbols.get_obj(synr).dim;
        if dim == 0 || self.error_condition(dim_pos >= 1 && dim_pos <= dim, ERR_BADDIMENSION) {
            return None;
        }
        let filter_ix = if filter_nr == DOMC_EXPAND {
            None
        } else {
            match self.filters.find(filter_nr) {
                Some(ix) => Some(ix),
                None => {
                    self.report_error(ERR_UNKNOWNFILTER);
                    return None;
                }
            }
        };

        let mut domain_indxs = IntMapping::new();
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        self.prepare_symbol_read("GetDomainElements", synr, &doms, FileMode::ReadRaw);
        let mut avals = [0.0f64; VAL_COUNT];
        let mut afdim = 0;
        let dpos = dim_pos as usize - 1;
        while self.do_read(&mut avals, &mut afdim) {
            let raw_nr = self.last_elem[dpos];
            if let Some(fix) = filter_ix {
                let map_nr = self.uels.get_user_map(raw_nr);
                if !self.filters.get(fix).in_filter(map_nr) {
                    // negative key flags the domain violation
                    self.last_elem[dpos] = -self.last_elem[dpos];
                    let marked = self.last_elem;
                    self.add_to_error_list_dom_errs(&marked, &avals);
                    self.last_elem[dpos] = -self.last_elem[dpos];
                    continue;
                }
            }
            domain_indxs.set_mapping(raw_nr, 1);
        }
        self.data_read_done();

        let mut nr_elem = 0;
        match dp.as_mut() {
            None => {
                for n in 1..=domain_indxs.highest_index() {
                    if domain_indxs.get_mapping(n) == 1 {
                        nr_elem += 1;
                    }
                }
            }
            Some(cb) => {
                let mut sorted = TupleStore::new(1, 1);
                for n in 1..=domain_indxs.highest_index() {
                    if domain_indxs.get_mapping(n) == 1 {
                        nr_elem += 1;
                        let index = [self.uels.new_usr_uel(n)];
                        let vf = [n as f64];
                        sorted.add(&index, &vf);
                    }
                }
                sorted.sort();
                sorted.start_read();
                let mut index = [0i32; 1];
                let mut vf = [0.0f64; 1];
                while sorted.next_record(&mut index, &mut vf) {
                    cb(vf[0] as i32, index[0]);
                }
            }
        }
        Some(nr_elem)
    }

    // ---- slice reads -------------------------------------------------------

    // First pass over a symbol: collect the per-dimension sets of UELs
    // observed; records stream back later with a dense 0-based local index.
    pub fn data_read_slice_start(&mut self, synr: i32) -> Option<Vec<i32>> {
        self.slice_synr = synr;
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        let nr_recs = self.prepare_symbol_read("DataReadSliceStart", self.slice_synr, &doms, FileMode::ReadRaw);
        if nr_recs < 0 {
            return None;
        }
        for d in 0..MAX_INDEX_DIM {
            self.slice_indxs[d].clear();
            self.slice_rev_map[d].clear();
        }
        let mut avals = [0.0f64; VAL_COUNT];
        let mut afdim = 0;
        while self.do_read(&mut avals, &mut afdim) {
            for d in 0..self.cur_dim {
                self.slice_indxs[d].set_mapping(self.last_elem[d], 1);
            }
        }
        let dim = self.cur_dim;
        self.data_read_done();

        let mut elem_counts = vec![0i32; MAX_INDEX_DIM];
        for d in 0..dim {
            let mut cnt = 0;
            for n in 0..=self.slice_indxs[d].highest_index() {
                if self.slice_indxs[d].get_mapping(n) >= 0 {
                    self.slice_indxs[d].set_mapping(n, cnt); // zero based
                    self.slice_rev_map[d].set_mapping(cnt, n);
                    cnt += 1;
                }
            }
            elem_counts[d] = cnt;
        }
        self.cur_dim = dim;
        self.mode = FileMode::ReadSlice;
        Some(elem_counts)
    }

    // Fix zero or more index positions; free positions report their dense
    // local index to the callback.
    pub fn data_read_slice(
        &mut self,
        uel_filter: &[&str],
        dp: &mut dyn FnMut(&[i32], &[f64]),
    ) -> Option<i32> {
        if !self.major_check_mode("DataReadSlice", &[FileMode::ReadSlice]) {
            return None;
        }
        let mut good = true;
        let mut dimen = 0;
        let mut elem_nrs = [0i32; MAX_INDEX_DIM];
        for d in 0..self.cur_dim {
            self.slice_elems[d] = uel_filter[d].to_string();
            if uel_filter[d].is_empty() {
                elem_nrs[d] = -1;
                dimen += 1;
            } else {
                elem_nrs[d] = self.uels.index_of(uel_filter[d]);
                if elem_nrs[d] < 0 {
                    good = false;
                }
            }
        }
        self.mode = FileMode::ReadInit;
        if !good {
            return None;
        }
        let doms = [DOMC_UNMAPPED; MAX_INDEX_DIM];
        self.prepare_symbol_read("DataReadSlice", self.slice_synr, &doms, FileMode::ReadSlice);
        let mut avals = [0.0f64; VAL_COUNT];
        let mut afdim = 0;
        let mut his_indx = [0i32; MAX_INDEX_DIM];
        while self.do_read(&mut avals, &mut afdim) {
            let mut good_indx = true;
            let mut his_dim = 0;
            for d in 0..self.cur_dim {
                if elem_nrs[d] == -1 {
                    his_indx[his_dim] = self.slice_indxs[d].get_mapping(self.last_elem[d]);
                    his_dim += 1;
                } else if elem_nrs[d] != self.last_elem[d] {
                    good_indx = false;
                }
            }
            if good_indx {
                dp(&his_indx[..his_dim], &avals);
            }
        }
        Some(dimen)
    }

    // Map dense slice indices back to UEL strings.
    pub fn data_slice_uels(&mut self, slice_keys: &[i32]) -> Option<Vec<String>> {
        if !self.major_check_mode("DataSliceUELS", &[FileMode::ReadSlice]) {
            return None;
        }
        let mut out = Vec::with_capacity(self.cur_dim);
        let mut his_dim = 0;
        for d in 0..self.cur_dim {
            if !self.slice_elems[d].is_empty() {
                out.push(self.slice_elems[d].clone());
            } else {
                let n = self.slice_rev_map[d].get_mapping(slice_keys[his_dim]);
                his_dim += 1;
                if n < 0 {
                    out.push("?".to_string());
                } else {
                    out.push(self.uels.get(n).to_string());
                }
            }
        }
        Some(out)
    }

    // ---- UEL registration and queries --------------------------------------

    pub fn uel_register_raw_start(&mut self) -> bool {
        if !self.major_check_mode("UELRegisterRawStart", &[FileMode::WriteInit]) {
            return false;
        }
        self.mode_after_reg = FileMode::WriteInit;
        self.mode = FileMode::RegisterRaw;
        true
    }

    // Raw registration: the internal index is assigned by the system.
    pub fn uel_register_raw(&mut self, uel: &str) -> bool {
        if self.mode != FileMode::RegisterRaw && !self.check_mode("UELRegisterRaw", &[FileMode::RegisterRaw]) {
            return false;
        }
        let sv = uel.trim_end();
        if self.error_condition(is_good_uel_string(sv), ERR_BADUELSTR) {
            return false;
        }
        self.uels.add(sv);
        true
    }

    pub fn uel_register_str_start(&mut self) -> bool {
        if !self.major_check_mode("UELRegisterStrStart", &[FileMode::ReadInit, FileMode::WriteInit]) {
            return false;
        }
        self.mode_after_reg = self.mode;
        self.mode = FileMode::RegisterStr;
        true
    }

    // String registration maps into user space; re-registering returns
    // the same index.
    pub fn uel_register_str(&mut self, uel: &str) -> Option<i32> {
        if self.mode != FileMode::RegisterStr && !self.check_mode("UELRegisterStr", &[FileMode::RegisterStr]) {
            return None;
        }
        let sv = uel.trim_end();
        if self.error_condition(is_good_uel_string(sv), ERR_BADUELSTR) {
            return None;
        }
        Some(self.uels.add_usr_new(sv))
    }

    pub fn uel_register_map_start(&mut self) -> bool {
        if !self.major_check_mode("UELRegisterMapStart", &[FileMode::ReadInit, FileMode::WriteInit]) {
            return false;
        }
        self.mode_after_reg = self.mode;
        self.mode = FileMode::RegisterMap;
        true
    }

    // Mapped registration under a caller-chosen user index; the same
    // element under a different index is a conflict.
    pub fn uel_register_map(&mut self, umap: i32, uel: &str) -> bool {
        if self.mode != FileMode::RegisterMap && !self.check_mode("UELRegisterMap", &[FileMode::RegisterMap]) {
            return false;
        }
        let sv = uel.trim_end().to_string();
        if self.error_condition(is_good_uel_string(&sv), ERR_BADUELSTR) {
            return false;
        }
        let res = self.uels.add_usr_indx_new(&sv, umap);
        !self.error_condition(res >= 0, ERR_UELCONFLICT)
    }

    pub fn uel_register_done(&mut self) -> bool {
        let allowed = &[FileMode::RegisterRaw, FileMode::RegisterMap, FileMode::RegisterStr];
        if !self.major_check_mode("UELRegisterDone", allowed) {
            return false;
        }
        self.mode = self.mode_after_reg;
        true
    }

    // String and user map of an internal index.
    pub fn um_uel_get(&self, uel_nr: i32) -> Option<(String, i32)> {
        if uel_nr >= 1 && uel_nr <= self.uels.count() {
            Some((self.uels.get(uel_nr).to_string(), self.uels.get_user_map(uel_nr)))
        } else {
            None
        }
    }

    // Total count and the highest user mapping in use.
    pub fn um_uel_info(&self) -> (i32, i32) {
        if self.stream.is_none() {
            (0, 0)
        } else {
            (self.uels.count(), self.uels.usr_to_ent.highest_index())
        }
    }

    pub fn um_find_uel(&mut self, uel: &str) -> Option<(i32, i32)> {
        let n = self.uels.index_of(uel.trim_end());
        if n < 0 {
            None
        } else {
            Some((n, self.uels.get_user_map(n)))
        }
    }

    // String for a user index.
    pub fn get_uel(&self, user_nr: i32) -> Option<String> {
        let en = self.uels.user_to_internal(user_nr);
        if en >= 1 {
            Some(self.uels.get(en).to_string())
        } else {
            None
        }
    }

    // 0 renamed, 2 unknown old name, 3 new name exists, or the bad-UEL
    // error code.
    pub fn rename_uel(&mut self, old_name: &str, new_name: &str) -> i32 {
        let s = new_name.trim_end().to_string();
        if !is_good_uel_string(&s) {
            return ERR_BADUELSTR;
        }
        let n = self.uels.index_of(old_name.trim_end());
        if n < 0 {
            return 2;
        }
        if self.uels.index_of(&s) >= 0 {
            return 3;
        }
        self.uels.rename(n, &s);
        0
    }

    pub fn uel_max_length(&self) -> i32 {
        self.uels.max_uel_length()
    }

    // ---- filters -----------------------------------------------------------

    pub fn filter_exists(&mut self, filter_nr: i32) -> bool {
        if !self.major_check_mode("FilterExists", ANY_READ_MODE) {
            return false;
        }
        self.filters.find(filter_nr).is_some()
    }

    pub fn filter_register_start(&mut self, filter_nr: i32) -> bool {
        if !self.major_check_mode("FilterRegisterStart", &[FileMode::ReadInit]) {
            return false;
        }
        if self.error_condition(filter_nr >= 1, ERR_BAD_FILTER_NR) {
            return false;
        }
        let max_uel = self.uels.usr_to_ent.highest_index();
        let ix = self.filters.add(Filter::new(filter_nr, max_uel));
        self.cur_filter_ix = Some(ix);
        self.mode = FileMode::RegisterFilter;
        true
    }

    // Enable one user UEL in the filter being defined; it must be mapped.
    pub fn filter_register(&mut self, uel_map: i32) -> bool {
        if self.mode != FileMode::RegisterFilter
            && !self.check_mode("FilterRegister", &[FileMode::RegisterFilter])
        {
            return false;
        }
        let ix = match self.cur_filter_ix {
            Some(ix) => ix,
            None => return false,
        };
        let max_uel = self.filters.get(ix).max_uel;
        if self.error_condition(uel_map >= 1 && uel_map <= max_uel, ERR_BAD_FILTER_INDX) {
            return false;
        }
        let en = self.uels.user_to_internal(uel_map);
        if en >= 1 {
            self.filters.get_mut(ix).set_filter(uel_map, true);
            true
        } else {
            self.report_error(ERR_FILTER_UNMAPPED);
            false
        }
    }

    pub fn filter_register_done(&mut self) -> bool {
        if !self.major_check_mode("FilterRegisterDone", &[FileMode::RegisterFilter]) {
            return false;
        }
        self.mode = FileMode::ReadInit;
        if let Some(ix) = self.cur_filter_ix.take() {
            let mut sorted = true;
            if self.uels.map_status() == MapStatus::Unsorted {
                let mut lv = -1;
                for n in 1..=self.uels.count() {
                    let v = self.uels.get_user_map(n);
                    if !self.filters.get(ix).in_filter(v) {
                        continue;
                    }
                    if v <= lv {
                        sorted = false;
                        break;
                    }
                    lv = v;
                }
            }
            self.filters.get_mut(ix).sorted = sorted;
        }
        true
    }

    // ---- acronyms ----------------------------------------------------------

    pub fn acronym_count(&self) -> i32 {
        self.acronyms.len() as i32
    }

    // Returns the 1-based table index, 0 for a consistent duplicate name,
    // -1 for an inconsistent addition.
    pub fn acronym_add(&mut self, name: &str, text: &str, aindx: i32) -> i32 {
        for n in 0..self.acronyms.len() {
            let (same_name, same_map) = {
                let a = self.acronyms.get(n);
                (a.name.eq_ignore_ascii_case(name), a.map == aindx)
            };
            if same_name {
                if self.error_condition(same_map, ERR_ACROBADADDITION) {
                    return -1;
                }
                return n as i32;
            }
            if self.error_condition(!same_map, ERR_ACROBADADDITION) {
                return -1;
            }
        }
        let pos = self.acronyms.add(name, &make_good_expl_text(text), aindx);
        self.acronyms.get_mut(pos).read_map = aindx;
        pos as i32 + 1
    }

    pub fn acronym_get_info(&self, n: i32) -> Option<(String, String, i32)> {
        if n < 1 || n > self.acronyms.len() as i32 {
            return None;
        }
        let a = self.acronyms.get(n as usize - 1);
        Some((a.name.clone(), a.text.clone(), a.map))
    }

    // While writing this renames an entry; while reading it installs the
    // client's read mapping for the code.
    pub fn acronym_set_info(&mut self, n: i32, name: &str, text: &str, aindx: i32) -> bool {
        if self.error_condition(n >= 1 && n <= self.acronyms.len() as i32, ERR_BADACRONUMBER) {
            return false;
        }
        let ix = n as usize - 1;
        let auto_gen = self.acronyms.get(ix).auto_gen;
        if ANY_WRITE_MODE.contains(&self.mode) || auto_gen {
            if self.error_condition(is_good_ident(name), ERR_BADACRONAME) {
                return false;
            }
            if auto_gen {
                let read_map = self.acronyms.get(ix).read_map;
                if self.error_condition(read_map == aindx, ERR_BADACROINDEX) {
                    return false;
                }
                self.acronyms.get_mut(ix).auto_gen = false;
            } else {
                let map = self.acronyms.get(ix).map;
                if self.error_condition(aindx == map, ERR_BADACROINDEX) {
                    return false;
                }
            }
            let text = make_good_expl_text(text);
            let a = self.acronyms.get_mut(ix);
            a.name = name.to_string();
            a.text = text;
        } else if self.acronyms.get(ix).read_map != aindx {
            let same_name = self.acronyms.get(ix).name.eq_ignore_ascii_case(name);
            if self.error_condition(same_name, ERR_BADACRONAME) {
                return false;
            }
            let unique = self.acronyms.iter().all(|a| a.read_map != aindx);
            if self.error_condition(unique, ERR_ACRODUPEMAP) {
                return false;
            }
            self.acronyms.get_mut(ix).read_map = aindx;
        }
        true
    }

    // Value of the auto-acronym counter before setting it; negative input
    // leaves it unchanged. Zero disables auto generation.
    pub fn acronym_next_nr(&mut self, nv: i32) -> i32 {
        let res = self.next_auto_acronym;
        if nv >= 0 {
            self.next_auto_acronym = nv;
        }
        res
    }

    pub fn acronym_get_mapping(&mut self, n: i32) -> Option<(i32, i32, bool)> {
        if self.error_condition(n >= 1 && n <= self.acronyms.len() as i32, ERR_BADACRONUMBER) {
            return None;
        }
        let a = self.acronyms.get(n as usize - 1);
        Some((a.map, a.read_map, a.auto_gen))
    }

    // Index of an acronym value; zero when the value is no acronym.
    pub fn acronym_index(&self, v: f64) -> i32 {
        if v < self.zvalacr {
            0
        } else {
            (v / self.zvalacr).round() as i32
        }
    }

    pub fn acronym_name(&self, v: f64) -> Option<String> {
        let indx = self.acronym_index(v);
        if indx <= 0 {
            return None;
        }
        Some(match self.acronyms.find_by_map(indx) {
            None => format!("UnknownAcronym{}", indx),
            Some(n) => self.acronyms.get(n).name.clone(),
        })
    }

    pub fn acronym_value(&self, aindx: i32) -> f64 {
        if aindx <= 0 {
            0.0
        } else {
            self.zvalacr * aindx as f64
        }
    }

    // ---- set texts ---------------------------------------------------------

    // Register a string in the set-text pool; the returned index can be
    // used as the level value of a set record.
    pub fn add_set_text(&mut self, txt: &str) -> Option<i32> {
        let txt = make_good_expl_text(txt);
        match self.set_texts.as_mut() {
            Some(pool) => Some(pool.add(&txt)),
            None => None,
        }
    }

    pub fn set_text_node_nr(&mut self, txt_nr: i32, node: i32) -> bool {
        match self.set_texts.as_mut() {
            Some(pool) => pool.set_node(txt_nr, node),
            None => false,
        }
    }

    // String and node number of a set-text entry.
    pub fn get_elem_text(&self, txt_nr: i32) -> Option<(String, i32)> {
        let pool = self.set_texts.as_ref()?;
        if txt_nr < 0 || txt_nr as usize >= pool.len() {
            return None;
        }
        Some((pool.get(txt_nr).to_string(), pool.node(txt_nr)))
    }

    pub fn set_has_text(&self, synr: i32) -> bool {
        synr >= 1
            && synr <= self.symbols.count() as i32
            && self.symbols.get_obj(synr).has_set_text()
    }

    // ---- aliases -----------------------------------------------------------

    // One of the two identifiers must be a known set, alias or *; the
    // other becomes the new alias for it.
    pub fn add_alias(&mut self, id1: &str, id2: &str) -> bool {
        if !self.major_check_mode("AddAlias", ANY_WRITE_MODE) {
            return false;
        }
        let synr1 = if id1 == "*" { std::i32::MAX } else { self.symbols.index_of(id1) };
        let synr2 = if id2 == "*" { std::i32::MAX } else { self.symbols.index_of(id2) };
        if self.error_condition((synr1 >= 0) != (synr2 >= 0), ERR_ALIASSETEXPECTED) {
            return false;
        }
        let (mut synr, name) = if synr1 > 0 { (synr1, id2) } else { (synr2, id1) };
        if synr == std::i32::MAX {
            synr = 0;
        } else {
            let dt = self.symbols.get_obj(synr).data_type;
            if self.error_condition(dt == DataType::Set || dt == DataType::Alias, ERR_ALIASSETEXPECTED) {
                return false;
            }
        }
        if !self.is_good_new_symbol(name) {
            return false;
        }
        let (dim, expl) = if synr == 0 {
            (1, "Aliased with *".to_string())
        } else {
            (
                self.symbols.get_obj(synr).dim,
                format!("Aliased with {}", self.symbols.get_string(synr)),
            )
        };
        let sym = Symbol::new(dim, DataType::Alias, synr, expl);
        self.symbols.add(name, sym);
        true
    }

    // ---- comments and domain queries ---------------------------------------

    // Comment lines attach to a symbol; synr <= 0 targets the symbol
    // whose write is in progress.
    pub fn symbol_add_comment(&mut self, synr: i32, txt: &str) -> bool {
        if !self.major_check_mode("SymbolAddComment", ANY_WRITE_MODE) {
            return false;
        }
        let target = if synr <= 0 { self.cur_sym } else { synr };
        if target < 1 || target > self.symbols.count() as i32 {
            self.report_error(ERR_NOSYMBOLFORCOMMENT);
            return false;
        }
        self.symbols.get_obj_mut(target).comments.push(txt.to_string());
        true
    }

    pub fn symbol_get_comment(&self, synr: i32, n: i32) -> Option<String> {
        if synr >= 1 && synr <= self.symbols.count() as i32 {
            let sym = self.symbols.get_obj(synr);
            if n >= 1 && n as usize <= sym.comments.len() {
                return Some(sym.comments[n as usize - 1].clone());
            }
        }
        None
    }

    // Reference domain per dimension; 0 stands for the universe.
    pub fn symbol_get_domain(&mut self, synr: i32, dom_synrs: &mut [i32]) -> bool {
        if self.error_condition(synr >= 1 && synr <= self.symbols.count() as i32, ERR_BADSYMBOLINDEX) {
            return false;
        }
        let sym = self.symbols.get_obj(synr);
        for d in 0..sym.dim as usize {
            dom_synrs[d] = match sym.dom_symbols {
                Some(ref doms) => doms[d],
                None => 0,
            };
        }
        true
    }

    // 0 bad index, 1 no domain info, 2 relaxed strings, 3 reference sets.
    pub fn symbol_get_domain_x(&mut self, synr: i32, dom_ids: &mut Vec<String>) -> i32 {
        if self.error_condition(
            !self.symbols.is_empty() && synr >= 1 && synr <= self.symbols.count() as i32,
            ERR_BADSYMBOLINDEX,
        ) {
            return 0;
        }
        let dim = self.symbols.get_obj(synr).dim as usize;
        dom_ids.clear();
        dom_ids.resize(dim, "*".to_string());

        let (dom_strings, dom_symbols) = {
            let sym = self.symbols.get_obj(synr);
            (sym.dom_strings.clone(), sym.dom_symbols.clone())
        };
        if let Some(ds) = dom_strings {
            for d in 0..dim {
                if ds[d] > 0 {
                    dom_ids[d] = self.domain_strs[ds[d] as usize - 1].clone();
                }
            }
            2
        } else if let Some(doms) = dom_symbols {
            for d in 0..dim {
                if doms[d] > 0 {
                    dom_ids[d] = self.symbols.get_string(doms[d]).to_string();
                }
            }
            3
        } else {
            1
        }
    }

    // ---- symbol and system queries -----------------------------------------

    // Search by name, case-insensitive; "*" finds the universe.
    pub fn find_symbol(&mut self, name: &str) -> Option<i32> {
        if name == "*" {
            return Some(0);
        }
        let n = self.symbols.index_of(name);
        if n >= 1 {
            Some(n)
        } else {
            None
        }
    }

    pub fn symbol_info(&self, synr: i32) -> Option<(String, i32, DataType)> {
        if synr == 0 {
            return Some(("*".to_string(), 1, DataType::Set));
        }
        if synr >= 1 && synr <= self.symbols.count() as i32 {
            let sym = self.symbols.get_obj(synr);
            Some((self.symbols.get_string(synr).to_string(), sym.dim, sym.data_type))
        } else {
            None
        }
    }

    // Record count (scalars report one), user info and explanatory text.
    pub fn symbol_info_x(&self, synr: i32) -> Option<(i32, i32, String)> {
        if synr == 0 {
            return Some((self.uel_cnt_orig, 0, "Universe".to_string()));
        }
        if synr >= 1 && synr <= self.symbols.count() as i32 {
            let sym = self.symbols.get_obj(synr);
            let rec_cnt = if sym.dim == 0 { 1 } else { sym.data_count };
            Some((rec_cnt, sym.user_info, sym.expl_text.clone()))
        } else {
            None
        }
    }

    pub fn symbol_dim(&self, synr: i32) -> i32 {
        if synr == 0 {
            return 1;
        }
        if synr >= 1 && synr <= self.symbols.count() as i32 {
            self.symbols.get_obj(synr).dim
        } else {
            -1
        }
    }

    pub fn symbol_count(&self) -> i32 {
        self.symbols.count() as i32
    }

    // Symbol count and UEL count.
    pub fn system_info(&self) -> (i32, i32) {
        (self.symbols.count() as i32, self.uels.count())
    }

    pub fn current_dim(&self) -> i32 {
        self.cur_dim as i32
    }

    pub fn symb_max_length(&self) -> i32 {
        let mut acc = 0;
        for n in 1..=self.symbols.count() as i32 {
            acc = acc.max(self.symbols.get_string(n).len() as i32);
        }
        acc
    }

    // Longest UEL per dimension of one symbol; returns the overall max.
    pub fn symb_indx_max_length(&mut self, synr: i32) -> (i32, Vec<i32>) {
        let mut length_info = vec![0i32; MAX_INDEX_DIM];
        if self.mode != FileMode::ReadInit && !self.check_mode("SymbIndxMaxLength", &[FileMode::ReadInit]) {
            return (0, length_info);
        }
        if synr < 0 || synr > self.symbols.count() as i32 {
            return (0, length_info);
        }
        if self.data_read_raw_start(synr).is_none() {
            return (0, length_info);
        }
        let mut res = 0;
        if self.cur_dim > 0 {
            let uel_count = self.uels.count();
            let mut avals = [0.0f64; VAL_COUNT];
            let mut afdim = 0;
            while self.do_read(&mut avals, &mut afdim) {
                for d in 0..self.cur_dim {
                    let uel = self.last_elem[d];
                    if uel >= 1 && uel <= uel_count {
                        let l = self.uels.get(uel).len() as i32;
                        if l > length_info[d] {
                            length_info[d] = l;
                        }
                    }
                }
            }
            for d in 0..self.cur_dim {
                if length_info[d] > res {
                    res = length_info[d];
                }
            }
        }
        self.data_read_done();
        (res, length_info)
    }

    // Version string and producer of the open file; an appending producer
    // is listed after the original one.
    pub fn file_version(&self) -> (String, String) {
        let producer = if self.producer2.is_empty() {
            self.producer.clone()
        } else {
            format!("{};{}", self.producer, self.producer2)
        };
        (self.file_system_id.clone(), producer)
    }

    // Format version and compression level.
    pub fn file_info(&self) -> (i32, i32) {
        match self.status {
            FileStatus::NotOpen => (0, 0),
            FileStatus::ReadMode => (self.version_read, self.compr_lev),
            FileStatus::WriteMode => (VERSION, self.compr_lev),
        }
    }

    pub fn store_domain_sets(&self) -> bool {
        self.store_domain_sets
    }

    pub fn set_store_domain_sets(&mut self, x: bool) {
        self.store_domain_sets = x;
    }

    // ---- error queries -----------------------------------------------------

    pub fn data_error_count(&self) -> i32 {
        self.error_list.count() as i32
    }

    // Error record with the violation flags cleared.
    pub fn data_error_record(&mut self, rec_nr: i32, keys: &mut [i32], values: &mut [f64]) -> bool {
        let res = self.data_error_record_x(rec_nr, keys, values);
        if res {
            for d in 0..self.cur_dim.min(keys.len()) {
                if keys[d] < 0 {
                    keys[d] = -keys[d];
                }
            }
        }
        res
    }

    // Error record; negative keys mark the violating dimensions.
    pub fn data_error_record_x(&mut self, rec_nr: i32, keys: &mut [i32], values: &mut [f64]) -> bool {
        let allowed = &[
            FileMode::ReadInit,
            FileMode::WriteInit,
            FileMode::ReadMap,
            FileMode::ReadMapR,
            FileMode::WriteRaw,
            FileMode::WriteMap,
            FileMode::WriteStr,
        ];
        if !allowed.contains(&self.mode) && !self.check_mode("DataErrorRecord", allowed) {
            return false;
        }
        if self.error_list.is_empty() {
            return false;
        }
        if rec_nr < 1 || rec_nr as usize > self.error_list.count() {
            self.report_error(ERR_BADERRORRECORD);
            return false;
        }
        let mut k = [0i32; MAX_INDEX_DIM];
        let mut v = [0.0f64; VAL_COUNT];
        self.error_list.get_record(rec_nr as usize - 1, &mut k, &mut v);
        let nk = keys.len().min(MAX_INDEX_DIM);
        keys[..nk].copy_from_slice(&k[..nk]);
        let nv = values.len().min(VAL_COUNT);
        values[..nv].copy_from_slice(&v[..nv]);
        true
    }

    // Total number of errors seen on this handle.
    pub fn error_count(&self) -> i32 {
        self.err_cnt_total
    }

    // First error since the last call; reading clears it. Stream errors
    // take priority.
    pub fn get_last_error(&mut self) -> i32 {
        match self.stream.as_mut() {
            None => {
                let le = self.last_error;
                self.last_error = ERR_NOERROR;
                le
            }
            Some(s) => {
                let res = s.last_io_result();
                if res == ERR_NOERROR {
                    let le = self.last_error;
                    self.last_error = ERR_NOERROR;
                    le
                } else {
                    res
                }
            }
        }
    }

    pub fn error_str(err_nr: i32) -> String {
        error_text(err_nr)
    }
}

impl Drop for GdxFile {
    fn drop(&mut self) {
        if self.mode != FileMode::NotOpen {
            self.close();
        }
    }
}
