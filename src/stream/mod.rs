use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::errors::{Result, ERR_FILEERROR, ERR_NOERROR};

// Size of the buffered file window; also the flush threshold for the
// compression staging buffer.
const BUFFER_SIZE: usize = 32 * 1024;

// Identity pattern written at file start. A reader that sees it
// byte-swapped is looking at data produced with the wrong byte order.
const ORDER_MARK: u16 = 0x1234;

// Buffered little-endian byte stream over a file.
//
// All primitives are little-endian on disk regardless of host. Failures
// are recorded as the stream's last error and surface to the engine
// through last_io_result(); the primitives themselves return default
// values so a read loop can keep its shape and check for errors at the
// boundaries.
//
// When the compression flag is on, written bytes accumulate in a staging
// buffer which is emitted as a framed block
// (uncompressed-length:u32, compressed-length:u32, compressed-bytes)
// whenever it fills up, the flag is turned off, or the position is
// queried or changed. Reads recognize the framing and stream-decompress
// block by block.
pub struct GdxStream {
    file: File,

    buf: Vec<u8>,
    nr_loaded: usize,
    nr_read: usize,
    nr_written: usize,
    // file offset of buf[0]
    base: u64,

    compress: bool,
    // staging for compressed writes
    cbuf: Vec<u8>,
    // scratch holding one decompressed block
    dbuf: Vec<u8>,
    dpos: usize,

    order_ok: bool,
    last_error: i32,
}

impl GdxStream {
    fn new(file: File) -> GdxStream {
        GdxStream {
            file,
            buf: vec![0; BUFFER_SIZE],
            nr_loaded: 0,
            nr_read: 0,
            nr_written: 0,
            base: 0,
            compress: false,
            cbuf: Vec::new(),
            dbuf: Vec::new(),
            dpos: 0,
            order_ok: true,
            last_error: ERR_NOERROR,
        }
    }

    // Create a new file for writing, emitting the byte-order probe.
    pub fn create(path: &str) -> Result<GdxStream> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut s = GdxStream::new(file);
        s.write_word(ORDER_MARK);
        Ok(s)
    }

    // Open an existing file for reading and check the byte-order probe.
    pub fn open_read(path: &str) -> Result<GdxStream> {
        let file = File::open(path)?;
        let mut s = GdxStream::new(file);
        s.read_order_mark();
        Ok(s)
    }

    // Open an existing file for reading and writing (append mode).
    pub fn open_read_write(path: &str) -> Result<GdxStream> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let mut s = GdxStream::new(file);
        s.read_order_mark();
        Ok(s)
    }

    fn read_order_mark(&mut self) {
        let mark = self.read_word();
        self.order_ok = mark == ORDER_MARK;
    }

    pub fn good_byte_order(&self) -> bool {
        self.order_ok
    }

    // The compression hook is statically linked, so it is always available.
    pub fn can_compress(&self) -> bool {
        true
    }

    fn note_error(&mut self, e: &io::Error) {
        if self.last_error == ERR_NOERROR {
            self.last_error = e.raw_os_error().unwrap_or(ERR_FILEERROR);
        }
    }

    // An error has been recorded and not yet collected.
    pub fn io_error_pending(&self) -> bool {
        self.last_error != ERR_NOERROR
    }

    // Return and clear the last recorded I/O error; 0 when none.
    pub fn last_io_result(&mut self) -> i32 {
        let res = self.last_error;
        self.last_error = ERR_NOERROR;
        res
    }

    fn flush_write_buffer(&mut self) -> io::Result<()> {
        if self.nr_written > 0 {
            let n = self.nr_written;
            self.file.write_all(&self.buf[..n])?;
            self.base += n as u64;
            self.nr_written = 0;
        }
        Ok(())
    }

    fn discard_read_buffer(&mut self) -> io::Result<()> {
        if self.nr_loaded > 0 {
            let logical = self.base + self.nr_read as u64;
            self.file.seek(SeekFrom::Start(logical))?;
            self.base = logical;
            self.nr_loaded = 0;
            self.nr_read = 0;
        }
        Ok(())
    }

    fn raw_read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        self.flush_write_buffer()?;
        let mut total = 0;
        while total < out.len() {
            if self.nr_read >= self.nr_loaded {
                self.base += self.nr_loaded as u64;
                self.nr_read = 0;
                self.nr_loaded = self.file.read(&mut self.buf)?;
                if self.nr_loaded == 0 {
                    break;
                }
            }
            let take = (out.len() - total).min(self.nr_loaded - self.nr_read);
            out[total..total + take].copy_from_slice(&self.buf[self.nr_read..self.nr_read + take]);
            self.nr_read += take;
            total += take;
        }
        Ok(total)
    }

    fn raw_write(&mut self, src: &[u8]) -> io::Result<()> {
        self.discard_read_buffer()?;
        let mut off = 0;
        while off < src.len() {
            if self.nr_written == BUFFER_SIZE {
                self.flush_write_buffer()?;
            }
            let take = (src.len() - off).min(BUFFER_SIZE - self.nr_written);
            self.buf[self.nr_written..self.nr_written + take].copy_from_slice(&src[off..off + take]);
            self.nr_written += take;
            off += take;
        }
        Ok(())
    }

    // Emit the staging buffer as one framed compressed block.
    fn emit_block(&mut self) -> io::Result<()> {
        if self.cbuf.is_empty() {
            return Ok(());
        }
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&self.cbuf)?;
        let packed = enc.finish()?;

        let mut hdr = [0u8; 8];
        {
            let mut w = &mut hdr[..];
            w.write_u32::<LittleEndian>(self.cbuf.len() as u32)?;
            w.write_u32::<LittleEndian>(packed.len() as u32)?;
        }
        self.raw_write(&hdr)?;
        self.raw_write(&packed)?;
        self.cbuf.clear();
        Ok(())
    }

    // Load and decompress the next framed block into the scratch buffer.
    fn fill_block(&mut self) -> io::Result<()> {
        self.dbuf.clear();
        self.dpos = 0;

        let mut hdr = [0u8; 8];
        let n = self.raw_read(&mut hdr)?;
        if n == 0 {
            return Ok(()); // end of stream
        }
        if n < hdr.len() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated block header"));
        }
        let mut r = &hdr[..];
        let raw_len = r.read_u32::<LittleEndian>()? as usize;
        let packed_len = r.read_u32::<LittleEndian>()? as usize;

        let mut packed = vec![0u8; packed_len];
        let n = self.raw_read(&mut packed)?;
        if n < packed_len {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated block"));
        }
        let mut dec = ZlibDecoder::new(&packed[..]);
        dec.read_to_end(&mut self.dbuf)?;
        if self.dbuf.len() != raw_len {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "bad block length"));
        }
        Ok(())
    }

    fn compressed_read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.dpos >= self.dbuf.len() {
            self.fill_block()?;
            if self.dbuf.is_empty() {
                return Ok(0);
            }
        }
        let take = out.len().min(self.dbuf.len() - self.dpos);
        out[..take].copy_from_slice(&self.dbuf[self.dpos..self.dpos + take]);
        self.dpos += take;
        Ok(take)
    }

    fn write_bytes(&mut self, src: &[u8]) -> io::Result<()> {
        if self.compress {
            self.cbuf.extend_from_slice(src);
            if self.cbuf.len() >= BUFFER_SIZE {
                self.emit_block()?;
            }
            Ok(())
        } else {
            self.raw_write(src)
        }
    }

    // Toggle block compression; boundaries are chosen by the engine.
    pub fn set_compression(&mut self, on: bool) {
        if let Err(e) = self.emit_block() {
            self.note_error(&e);
        }
        self.dbuf.clear();
        self.dpos = 0;
        self.compress = on;
    }

    // Absolute position of the next byte; pending compressed output is
    // framed first so the returned offset is a valid section start.
    pub fn position(&mut self) -> u64 {
        if let Err(e) = self.emit_block() {
            self.note_error(&e);
        }
        if self.nr_loaded > 0 {
            self.base + self.nr_read as u64
        } else {
            self.base + self.nr_written as u64
        }
    }

    pub fn set_position(&mut self, p: u64) {
        if let Err(e) = self.try_set_position(p) {
            self.note_error(&e);
        }
    }

    fn try_set_position(&mut self, p: u64) -> io::Result<()> {
        self.emit_block()?;
        self.flush_write_buffer()?;
        self.dbuf.clear();
        self.dpos = 0;
        self.nr_loaded = 0;
        self.nr_read = 0;
        self.base = p;
        self.file.seek(SeekFrom::Start(p))?;
        Ok(())
    }

    // Flush staging and the write buffer down to the file.
    pub fn flush_all(&mut self) {
        if let Err(e) = self.emit_block().and_then(|_| self.flush_write_buffer()) {
            self.note_error(&e);
        }
    }

    pub fn write_byte(&mut self, b: u8) {
        if let Err(e) = self.write_bytes(&[b]) {
            self.note_error(&e);
        }
    }

    pub fn write_word(&mut self, w: u16) {
        match WriteBytesExt::write_u16::<LittleEndian>(self, w) {
            Ok(()) => {}
            Err(e) => self.note_error(&e),
        }
    }

    pub fn write_integer(&mut self, v: i32) {
        match WriteBytesExt::write_i32::<LittleEndian>(self, v) {
            Ok(()) => {}
            Err(e) => self.note_error(&e),
        }
    }

    pub fn write_int64(&mut self, v: i64) {
        match WriteBytesExt::write_i64::<LittleEndian>(self, v) {
            Ok(()) => {}
            Err(e) => self.note_error(&e),
        }
    }

    pub fn write_double(&mut self, v: f64) {
        match WriteBytesExt::write_f64::<LittleEndian>(self, v) {
            Ok(()) => {}
            Err(e) => self.note_error(&e),
        }
    }

    // One byte length prefix followed by the bytes; longer input is cut
    // at 255 bytes.
    pub fn write_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let len = bytes.len().min(255);
        self.write_byte(len as u8);
        if let Err(e) = self.write_bytes(&bytes[..len]) {
            self.note_error(&e);
        }
    }

    // Two byte length prefix for long strings such as macro bodies.
    pub fn write_pchar(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let len = bytes.len().min(u16::max_value() as usize);
        self.write_word(len as u16);
        if let Err(e) = self.write_bytes(&bytes[..len]) {
            self.note_error(&e);
        }
    }

    pub fn read_byte(&mut self) -> u8 {
        match ReadBytesExt::read_u8(self) {
            Ok(v) => v,
            Err(e) => {
                self.note_error(&e);
                0
            }
        }
    }

    pub fn read_word(&mut self) -> u16 {
        match ReadBytesExt::read_u16::<LittleEndian>(self) {
            Ok(v) => v,
            Err(e) => {
                self.note_error(&e);
                0
            }
        }
    }

    pub fn read_integer(&mut self) -> i32 {
        match ReadBytesExt::read_i32::<LittleEndian>(self) {
            Ok(v) => v,
            Err(e) => {
                self.note_error(&e);
                0
            }
        }
    }

    pub fn read_int64(&mut self) -> i64 {
        match ReadBytesExt::read_i64::<LittleEndian>(self) {
            Ok(v) => v,
            Err(e) => {
                self.note_error(&e);
                0
            }
        }
    }

    pub fn read_double(&mut self) -> f64 {
        match ReadBytesExt::read_f64::<LittleEndian>(self) {
            Ok(v) => v,
            Err(e) => {
                self.note_error(&e);
                0.0
            }
        }
    }

    pub fn read_string(&mut self) -> String {
        let len = self.read_byte() as usize;
        let mut buf = vec![0u8; len];
        match self.read_exact(&mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(e) => {
                self.note_error(&e);
                String::new()
            }
        }
    }

    pub fn read_pchar(&mut self) -> String {
        let len = self.read_word() as usize;
        let mut buf = vec![0u8; len];
        match self.read_exact(&mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(e) => {
                self.note_error(&e);
                String::new()
            }
        }
    }
}

impl Read for GdxStream {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.compress {
            self.compressed_read(out)
        } else {
            self.raw_read(out)
        }
    }
}

impl Write for GdxStream {
    fn write(&mut self, src: &[u8]) -> io::Result<usize> {
        self.write_bytes(src)?;
        Ok(src.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit_block()?;
        self.flush_write_buffer()?;
        Ok(())
    }
}
