// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，运行结果消息支持中文（默认）和英文
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 切换消息语言（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 按键取消息并替换 `%{name}` 占位符
///
/// # 示例
/// ```no_run
/// use cell_kpi_stats::i18n::t_with_args;
/// let msg = t_with_args("aggregate.file_not_found", &[("path", "/tmp/kpi.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(rust_i18n::t!(key).to_string(), |msg, (name, value)| {
        msg.replace(&format!("%{{{}}}", name), value)
    })
}
