// ==========================================
// 小区性能统计工具 - 分隔文本输出
// ==========================================
// 与输入相同的分隔符与编码；非 UTF-8 目标经流式编码器转码
// encoding_rs 不提供 UTF-16 编码器，UTF-16 目标按码元直接写出
// ==========================================

use crate::domain::{Delimiter, OutputColumn, OutputRow};
use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;
use encoding_rs::{CoderResult, Encoder, Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::io::{self, Write};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16BE_BOM: &[u8] = b"\xFE\xFF";

/// 转码目标
enum Target {
    Encoder(Encoder),
    Utf16 { big_endian: bool },
}

/// UTF-8 → 目标编码的流式写入器
///
/// 上游按任意字节边界写入，未完整的 UTF-8 尾部暂存到下一次写入。
pub struct TranscodingWriter<W: Write> {
    inner: W,
    target: Target,
    pending: Vec<u8>,
    scratch: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        let target = if encoding == UTF_16LE {
            Target::Utf16 { big_endian: false }
        } else if encoding == UTF_16BE {
            Target::Utf16 { big_endian: true }
        } else {
            Target::Encoder(encoding.output_encoding().new_encoder())
        };
        Self {
            inner,
            target,
            pending: Vec::new(),
            scratch: Vec::new(),
        }
    }

    fn encode_str(&mut self, text: &str, last: bool) -> io::Result<()> {
        let Self {
            inner,
            target,
            scratch,
            ..
        } = self;

        match target {
            Target::Utf16 { big_endian } => {
                scratch.clear();
                for unit in text.encode_utf16() {
                    let bytes = if *big_endian {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    scratch.extend_from_slice(&bytes);
                }
                inner.write_all(scratch.as_slice())
            }
            Target::Encoder(encoder) => {
                let mut src = text;
                loop {
                    let needed = encoder
                        .max_buffer_length_from_utf8_if_no_unmappables(src.len())
                        .unwrap_or(src.len() * 4 + 16)
                        .max(16);
                    scratch.clear();
                    scratch.reserve(needed);

                    let (result, read, _unmappable) =
                        encoder.encode_from_utf8_to_vec(src, scratch, last);
                    inner.write_all(scratch.as_slice())?;
                    src = &src[read..];

                    match result {
                        CoderResult::InputEmpty => return Ok(()),
                        CoderResult::OutputFull => continue,
                    }
                }
            }
        }
    }

    /// 冲刷编码器尾部并返回底层写入器
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "输出流以不完整的 UTF-8 序列结束",
            ));
        }
        self.encode_str("", true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        let pending = std::mem::take(&mut self.pending);

        let valid_up_to = match std::str::from_utf8(&pending) {
            Ok(_) => pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, e));
            }
        };

        // valid_up_to 之前保证是合法 UTF-8
        let text = std::str::from_utf8(&pending[..valid_up_to])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.encode_str(text, false)?;
        self.pending = pending[valid_up_to..].to_vec();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// 将输出行序列化到写入器
///
/// # 参数
/// - encoding: 目标编码（与输入编码相同）
/// - write_bom: 是否写入 BOM（仅 UTF-8 / UTF-16 目标生效）
pub fn write_delimited<W: Write>(
    sink: W,
    rows: &[OutputRow],
    delimiter: Delimiter,
    encoding: &'static Encoding,
    write_bom: bool,
) -> ImportResult<W> {
    let mut sink = sink;
    if write_bom {
        if let Some(bom) = bom_bytes(encoding) {
            sink.write_all(bom).map_err(write_error)?;
        }
    }

    if encoding == UTF_8 {
        return write_records(sink, rows, delimiter);
    }

    let transcoder = write_records(TranscodingWriter::new(sink, encoding), rows, delimiter)?;
    transcoder.finish().map_err(write_error)
}

fn write_records<W: Write>(sink: W, rows: &[OutputRow], delimiter: Delimiter) -> ImportResult<W> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(sink);

    writer
        .write_record(OutputColumn::header())
        .map_err(|e| ImportError::WriteError(e.to_string()))?;
    for row in rows {
        writer
            .write_record(row.fields())
            .map_err(|e| ImportError::WriteError(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ImportError::WriteError(e.error().to_string()))
}

fn bom_bytes(encoding: &'static Encoding) -> Option<&'static [u8]> {
    if encoding == UTF_8 {
        Some(UTF8_BOM)
    } else if encoding == UTF_16LE {
        Some(UTF16LE_BOM)
    } else if encoding == UTF_16BE {
        Some(UTF16BE_BOM)
    } else {
        None
    }
}

fn write_error(err: io::Error) -> ImportError {
    ImportError::WriteError(err.to_string())
}
