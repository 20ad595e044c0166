// ==========================================
// 小区性能统计工具 - 编码识别
// ==========================================
// 流程: 有界读取文件前缀 → BOM 优先 → chardetng 统计猜测 → 名称归一 → 解码样本
// 归一规则（针对本业务数据分布，仅此三条）:
//   ascii → UTF-8
//   gb2312 → gb18030（encoding_rs 将 gb2312 标签解析为 GBK）
//   windows-1252 → UTF-8（低置信度误判）
// ==========================================

use crate::config::limits::{PREVIEW_MAX_BYTES, PREVIEW_MAX_LINES, READ_CHUNK_BYTES};
use crate::importer::error::ImportResult;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, GB18030, UTF_8};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// 有界读取得到的文件前缀
#[derive(Debug, Clone)]
pub struct PrefixSample {
    pub bytes: Vec<u8>,
    /// 是否已读到文件末尾
    pub reached_eof: bool,
}

/// 编码识别结果
#[derive(Debug, Clone, Copy)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub has_bom: bool,
}

impl DetectedEncoding {
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// 读取文件前缀：至多 2 MiB，或累计约 101 个换行即停止
pub fn read_prefix(path: &Path) -> ImportResult<PrefixSample> {
    let file = File::open(path)?;
    let mut reader = file.take(PREVIEW_MAX_BYTES);

    let mut bytes = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK_BYTES];
    let mut newlines = 0usize;
    let mut reached_eof = false;

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            // take() 到达上限时也返回 0，需要区分真实 EOF
            reached_eof = (bytes.len() as u64) < PREVIEW_MAX_BYTES;
            break;
        }
        newlines += chunk[..n].iter().filter(|&&b| b == b'\n').count();
        bytes.extend_from_slice(&chunk[..n]);
        if newlines >= PREVIEW_MAX_LINES {
            break;
        }
    }

    debug!(bytes = bytes.len(), newlines, reached_eof, "文件前缀读取完成");
    Ok(PrefixSample { bytes, reached_eof })
}

/// 识别字节编码
pub fn detect_encoding(sample: &PrefixSample) -> DetectedEncoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(&sample.bytes) {
        return DetectedEncoding {
            encoding,
            has_bom: true,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample.bytes, sample.reached_eof);
    let guess = detector.guess(None, true);
    let encoding = normalize_encoding_label(guess.name()).unwrap_or(guess);

    debug!(guess = guess.name(), normalized = encoding.name(), "编码猜测完成");
    DetectedEncoding {
        encoding,
        has_bom: false,
    }
}

/// 编码名称归一；未知标签返回 None
pub fn normalize_encoding_label(label: &str) -> Option<&'static Encoding> {
    match label.trim().to_ascii_lowercase().as_str() {
        "ascii" | "us-ascii" => Some(UTF_8),
        "gb2312" | "gbk" => Some(GB18030),
        "windows-1252" => Some(UTF_8),
        other => Encoding::for_label(other.as_bytes()),
    }
}

/// 将前缀解码为样本文本（去除 BOM）
///
/// 未读到 EOF 时截断到最后一个换行，避免半行进入预览。
pub fn decode_sample(sample: &PrefixSample, detected: &DetectedEncoding) -> String {
    let bytes = match Encoding::for_bom(&sample.bytes) {
        Some((_, bom_len)) if detected.has_bom => &sample.bytes[bom_len..],
        _ => &sample.bytes[..],
    };
    let (text, _had_errors) = detected.encoding.decode_without_bom_handling(bytes);

    if sample.reached_eof {
        return text.into_owned();
    }
    match text.rfind('\n') {
        Some(pos) => text[..=pos].to_string(),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample(bytes: &[u8]) -> PrefixSample {
        PrefixSample {
            bytes: bytes.to_vec(),
            reached_eof: true,
        }
    }

    #[test]
    fn test_normalize_encoding_label() {
        assert_eq!(normalize_encoding_label("ascii"), Some(UTF_8));
        assert_eq!(normalize_encoding_label("GB2312"), Some(GB18030));
        assert_eq!(normalize_encoding_label("GBK"), Some(GB18030));
        assert_eq!(normalize_encoding_label("windows-1252"), Some(UTF_8));
        assert_eq!(normalize_encoding_label("Big5"), Some(encoding_rs::BIG5));
        assert_eq!(normalize_encoding_label("Shift_JIS"), Some(encoding_rs::SHIFT_JIS));
        assert_eq!(normalize_encoding_label("no-such-encoding"), None);
    }

    #[test]
    fn test_ascii_detected_as_utf8() {
        let detected = detect_encoding(&sample(b"time,network\n2024-03-01,4G\n"));
        assert_eq!(detected.encoding, UTF_8);
        assert!(!detected.has_bom);
    }

    #[test]
    fn test_utf8_chinese_detected() {
        let text = "时间,小区ID,网络,小区名称\n2024-03-01,460-01,4G,北京朝阳一区\n".repeat(5);
        let detected = detect_encoding(&sample(text.as_bytes()));
        assert_eq!(detected.encoding, UTF_8);
    }

    #[test]
    fn test_gbk_bytes_detected_as_gb18030() {
        let text = "时间,小区ID,网络,小区名称,总流量\n2024-03-01,460-01,4G,北京朝阳区第一小区,12.5\n"
            .repeat(20);
        let (bytes, _, _) = GB18030.encode(&text);
        let detected = detect_encoding(&sample(&bytes));
        assert_eq!(detected.encoding, GB18030);
    }

    #[test]
    fn test_bom_overrides_guess() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("时间,网络\n".as_bytes());
        let s = sample(&bytes);
        let detected = detect_encoding(&s);
        assert_eq!(detected.encoding, UTF_8);
        assert!(detected.has_bom);
        assert_eq!(decode_sample(&s, &detected), "时间,网络\n");
    }

    #[test]
    fn test_decode_sample_truncates_partial_line() {
        let s = PrefixSample {
            bytes: b"a,b\n1,2\n3,".to_vec(),
            reached_eof: false,
        };
        let detected = detect_encoding(&s);
        assert_eq!(decode_sample(&s, &detected), "a,b\n1,2\n");
    }

    #[test]
    fn test_read_prefix_stops_after_line_budget() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..5000 {
            writeln!(file, "2024-03-01,{},4G", i).unwrap();
        }
        file.flush().unwrap();

        let prefix = read_prefix(file.path()).unwrap();
        assert!(!prefix.reached_eof);
        assert!(prefix.bytes.len() as u64 <= PREVIEW_MAX_BYTES);
        let newlines = prefix.bytes.iter().filter(|&&b| b == b'\n').count();
        assert!(newlines >= PREVIEW_MAX_LINES);
    }

    #[test]
    fn test_read_prefix_small_file_reaches_eof() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,2\n").unwrap();
        file.flush().unwrap();

        let prefix = read_prefix(file.path()).unwrap();
        assert!(prefix.reached_eof);
        assert_eq!(prefix.bytes, b"a,b\n1,2\n");
    }
}
