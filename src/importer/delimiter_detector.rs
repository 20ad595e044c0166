// ==========================================
// 小区性能统计工具 - 分隔符识别
// ==========================================
// 规则: 取前 20 个非空行，对每个候选分隔符打分
//   score = (切分后字段数 > 1 的行数) × (各行字段数一致 ? 2 : 1)
// 最高分胜出；平局按候选顺序 , ; \t |；全 0 默认逗号
// ==========================================

use crate::domain::Delimiter;

/// 参与打分的最大行数
pub const SAMPLE_LINES: usize = 20;

/// 识别样本文本的字段分隔符
pub fn detect_delimiter(sample_text: &str) -> Delimiter {
    let lines: Vec<&str> = sample_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    let mut best = Delimiter::Comma;
    let mut best_score = 0usize;
    for candidate in Delimiter::CANDIDATES {
        let score = score_delimiter(&lines, candidate);
        // 严格大于，保证平局时靠前的候选胜出
        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

fn score_delimiter(lines: &[&str], delimiter: Delimiter) -> usize {
    let counts: Vec<usize> = lines
        .iter()
        .map(|line| line.split(delimiter.as_char()).count())
        .collect();

    let multi_field_lines = counts.iter().filter(|&&n| n > 1).count();
    let consistent = counts.windows(2).all(|w| w[0] == w[1]);

    multi_field_lines * if consistent { 2 } else { 1 }
}
