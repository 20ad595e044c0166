// ==========================================
// 小区性能统计工具 - 文本规范化
// ==========================================
// 职责: 去 BOM / 全角括号折叠 / 空白折叠 / TRIM
// 表头与必需列名使用同一规则，比较与编码、排版无关
// ==========================================

const BOM: char = '\u{FEFF}';

/// 规范化表头文本
pub fn normalize_header(raw: &str) -> String {
    let without_bom = raw.strip_prefix(BOM).unwrap_or(raw);

    let mut out = String::with_capacity(without_bom.len());
    let mut pending_space = false;
    for c in without_bom.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(match c {
            '（' => '(',
            '）' => ')',
            other => other,
        });
    }
    out
}
