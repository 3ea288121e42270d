use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use std::error::Error as StdError;
use std::io::Error as IoError;

pub type Result<T> = std::result::Result<T, Error>;

pub const ERR_NOERROR: i32 = 0;
pub const ERR_NOFILE: i32 = -100000;
pub const ERR_FILEERROR: i32 = -100001;
pub const ERR_BADMODE: i32 = -100002;
pub const ERR_BADDIMENSION: i32 = -100003;
pub const ERR_BADELEMENTINDEX: i32 = -100004;
pub const ERR_BADSYMBOLINDEX: i32 = -100005;
pub const ERR_ELEMENTSEQUENCE: i32 = -100006;
pub const ERR_DUPLICATESYMBOL: i32 = -100007;
pub const ERR_DATANOTSORTED: i32 = -100008;
pub const ERR_DATADUPLICATE: i32 = -100009;
pub const ERR_UNKNOWNFILTER: i32 = -100010;
pub const ERR_BADSTRINGFORMAT: i32 = -100011;
pub const ERR_BADIDENTFORMAT: i32 = -100012;
pub const ERR_UELCONFLICT: i32 = -100013;
pub const ERR_DUPLICATESPECVAL: i32 = -100014;
pub const ERR_BADERRORRECORD: i32 = -100015;
pub const ERR_DUPLICATEUEL: i32 = -100016;
pub const ERR_BADUELSTR: i32 = -100017;
pub const ERR_UNDEFUEL: i32 = -100018;
pub const ERR_UELSECONDWRITE: i32 = -100019;
pub const ERR_UELNOTEMPTY: i32 = -100020;
pub const ERR_BAD_FILTER_NR: i32 = -100021;
pub const ERR_BAD_FILTER_INDX: i32 = -100022;
pub const ERR_FILTER_UNMAPPED: i32 = -100023;
pub const ERR_OBSOLETE_FUNCTION: i32 = -100024;
pub const ERR_RAWNOTSORTED: i32 = -100025;
pub const ERR_BAD_ALIAS_DIM: i32 = -100026;
pub const ERR_BADDATAMARKER_DATA: i32 = -100029;
pub const ERR_BADDATAMARKER_DIM: i32 = -100030;
pub const ERR_OPEN_BOI: i32 = -100031;
pub const ERR_OPEN_FILEHEADER: i32 = -100032;
pub const ERR_OPEN_FILEVERSION: i32 = -100033;
pub const ERR_OPEN_FILEMARKER: i32 = -100034;
pub const ERR_OPEN_SYMBOLMARKER1: i32 = -100035;
pub const ERR_OPEN_SYMBOLMARKER2: i32 = -100036;
pub const ERR_OPEN_UELMARKER1: i32 = -100037;
pub const ERR_OPEN_UELMARKER2: i32 = -100038;
pub const ERR_OPEN_TEXTMARKER1: i32 = -100039;
pub const ERR_OPEN_TEXTMARKER2: i32 = -100040;
pub const ERR_BADDATAFORMAT: i32 = -100041;
pub const ERR_NEXT_ERROR: i32 = -100042;
pub const ERR_OUT_OF_MEMORY: i32 = -100043;
pub const ERR_ZLIB_NOT_FOUND: i32 = -100044;
pub const ERR_OPEN_ACROMARKER1: i32 = -100045;
pub const ERR_OPEN_ACROMARKER2: i32 = -100046;
pub const ERR_BADACROINDEX: i32 = -100047;
pub const ERR_BADACRONUMBER: i32 = -100048;
pub const ERR_BADACRONAME: i32 = -100049;
pub const ERR_ACRODUPEMAP: i32 = -100050;
pub const ERR_ACROBADADDITION: i32 = -100051;
pub const ERR_UNKNOWNDOMAIN: i32 = -100052;
pub const ERR_BADDOMAIN: i32 = -100053;
pub const ERR_NODOMAINDATA: i32 = -100054;
pub const ERR_ALIASSETEXPECTED: i32 = -100055;
pub const ERR_BADDATATYPE: i32 = -100056;
pub const ERR_NOSYMBOLFORCOMMENT: i32 = -100057;
pub const ERR_DOMAINVIOLATION: i32 = -100058;
pub const ERR_FILEALREADYOPEN: i32 = -100059;
pub const ERR_FILETOOLDFORAPPEND: i32 = -100060;
pub const ERR_OPEN_DOMSMARKER1: i32 = -100061;
pub const ERR_OPEN_DOMSMARKER2: i32 = -100062;
pub const ERR_OPEN_DOMSMARKER3: i32 = -100063;

lazy_static! {
    static ref ERROR_TEXTS: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();

        m.insert(ERR_NOERROR, "No error");
        m.insert(ERR_NOFILE, "File name is empty");
        m.insert(ERR_FILEERROR, "File I/O error");
        m.insert(ERR_BADMODE, "Bad mode");
        m.insert(ERR_BADDIMENSION, "Bad dimension");
        m.insert(ERR_BADELEMENTINDEX, "Bad UEL Nr");
        m.insert(ERR_BADSYMBOLINDEX, "Bad symbol number");
        m.insert(ERR_ELEMENTSEQUENCE, "Element out of sequence");
        m.insert(ERR_DUPLICATESYMBOL, "Duplicate symbol");
        m.insert(ERR_DATANOTSORTED, "Data is not sorted");
        m.insert(ERR_DATADUPLICATE, "Duplicate keys");
        m.insert(ERR_UNKNOWNFILTER, "Unknown filter");
        m.insert(ERR_BADSTRINGFORMAT, "Bad quotes");
        m.insert(ERR_BADIDENTFORMAT, "Illegal identifier");
        m.insert(ERR_UELCONFLICT, "UEL string with different index");
        m.insert(ERR_DUPLICATESPECVAL, "Duplicate special value");
        m.insert(ERR_BADERRORRECORD, "Bad Error record number");
        m.insert(ERR_DUPLICATEUEL, "Duplicate UEL");
        m.insert(ERR_BADUELSTR, "Bad UEL string");
        m.insert(ERR_UNDEFUEL, "Unknown UEL");
        m.insert(ERR_UELSECONDWRITE, "gdx file has UEL table already");
        m.insert(ERR_UELNOTEMPTY, "UEL table is not empty");
        m.insert(ERR_BAD_FILTER_NR, "Bad filter number");
        m.insert(ERR_BAD_FILTER_INDX, "Bad index in filter");
        m.insert(ERR_FILTER_UNMAPPED, "Unmapped index in filter");
        m.insert(ERR_OBSOLETE_FUNCTION, "Use of obsolete function");
        m.insert(ERR_RAWNOTSORTED, "Data not sorted when writing raw");
        m.insert(ERR_BAD_ALIAS_DIM, "Bad dimension for aliased set");
        m.insert(ERR_BADDATAMARKER_DATA, "Expected data marker (DATA) not found in GDX file");
        m.insert(ERR_BADDATAMARKER_DIM, "Expected data marker (DIM) not found in GDX file");
        m.insert(ERR_OPEN_BOI, "Expected data marker (BOI) not found in GDX file");
        m.insert(ERR_OPEN_FILEHEADER, "Expected data marker (FILEHEADER) not found in GDX file");
        m.insert(ERR_OPEN_FILEVERSION, "GDX file version not supported");
        m.insert(ERR_OPEN_FILEMARKER, "Expected data marker (FILEMARKER) not found in GDX file");
        m.insert(ERR_OPEN_SYMBOLMARKER1, "Expected data marker (SYMBOL_1) not found in GDX file");
        m.insert(ERR_OPEN_SYMBOLMARKER2, "Expected data marker (SYMBOL_2) not found in GDX file");
        m.insert(ERR_OPEN_UELMARKER1, "Expected data marker (UEL_1) not found in GDX file");
        m.insert(ERR_OPEN_UELMARKER2, "Expected data marker (UEL_2) not found in GDX file");
        m.insert(ERR_OPEN_TEXTMARKER1, "Expected data marker (TEXT_1) not found in GDX file");
        m.insert(ERR_OPEN_TEXTMARKER2, "Expected data marker (TEXT_2) not found in GDX file");
        m.insert(ERR_BADDATAFORMAT, "File not recognized as a GDX file");
        m.insert(ERR_NEXT_ERROR, "Next error");
        m.insert(ERR_OUT_OF_MEMORY, "Out of memory");
        m.insert(ERR_ZLIB_NOT_FOUND, "Compression library not found");
        m.insert(ERR_OPEN_ACROMARKER1, "Expected data marker (ACRO_1) not found in GDX file");
        m.insert(ERR_OPEN_ACROMARKER2, "Expected data marker (ACRO_2) not found in GDX file");
        m.insert(ERR_BADACROINDEX, "Bad index for acronym");
        m.insert(ERR_BADACRONUMBER, "Bad acronym record number");
        m.insert(ERR_BADACRONAME, "Bad acronym name for update");
        m.insert(ERR_ACRODUPEMAP, "Bad acronym index for update");
        m.insert(ERR_ACROBADADDITION, "Bad addition to acronym table");
        m.insert(ERR_UNKNOWNDOMAIN, "Unknown domain");
        m.insert(ERR_BADDOMAIN, "Domain not set with dim=1");
        m.insert(ERR_NODOMAINDATA, "Set has no data");
        m.insert(ERR_ALIASSETEXPECTED, "Set expected for domain");
        m.insert(ERR_BADDATATYPE, "Bad data type");
        m.insert(ERR_NOSYMBOLFORCOMMENT, "No symbol to add comment to");
        m.insert(ERR_DOMAINVIOLATION, "Domain violation");
        m.insert(ERR_FILEALREADYOPEN, "File is already open");
        m.insert(ERR_FILETOOLDFORAPPEND, "File version to old for append");
        m.insert(ERR_OPEN_DOMSMARKER1, "Expected data marker (DOMS_1) not found in GDX file");
        m.insert(ERR_OPEN_DOMSMARKER2, "Expected data marker (DOMS_2) not found in GDX file");
        m.insert(ERR_OPEN_DOMSMARKER3, "Expected data marker (DOMS_3) not found in GDX file");

        m
    };
}

// Text for an engine error code; OS level codes fall through to a generic message.
pub fn error_text(code: i32) -> String {
    match ERROR_TEXTS.get(&code) {
        Some(s) => (*s).to_string(),
        None => format!("I/O error {}", code),
    }
}

#[derive(Debug)]
pub enum Error {
    Io(IoError),

    Code(i32),
}

impl Error {
    // The integer code stored in the handle's last-error slot.
    pub fn code(&self) -> i32 {
        match *self {
            Error::Io(ref inner) => inner.raw_os_error().unwrap_or(ERR_FILEERROR),
            Error::Code(code) => code,
        }
    }
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error::Io(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Error::Io(ref inner) => inner.fmt(f),
            Error::Code(code) => f.write_str(&error_text(code)),
        }
    }
}

impl StdError for Error {
    fn cause(&self) -> Option<&dyn StdError> {
        match *self {
            Error::Io(ref inner) => Some(inner),
            _ => None,
        }
    }
}
