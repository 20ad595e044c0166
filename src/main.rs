// ==========================================
// 小区性能统计工具 - 命令行入口
// ==========================================
// 用法:
//   cell-kpi-stats <INPUT> [--subtotal] [--grand-total] [--repeat-date]
//                  [--config <FILE>] [--preview-only] [--locale <zh-CN|en>]
// 结果以 JSON 输出到标准输出，日志输出到标准错误
// ==========================================

use cell_kpi_stats::api::AggregationApi;
use cell_kpi_stats::config::{AggregationOptions, ConfigManager};
use cell_kpi_stats::{i18n, logging};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cell-kpi-stats", version)]
#[command(about = "按日期与网络汇总小区性能指标", long_about = None)]
struct Cli {
    /// 输入文件（CSV/TSV 等分隔文本或 Excel）
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 每日插入小计行
    #[arg(long)]
    subtotal: bool,

    /// 末尾追加总计行
    #[arg(long)]
    grand_total: bool,

    /// 小计模式下明细行重复日期
    #[arg(long)]
    repeat_date: bool,

    /// 统计选项文件（JSON）；缺省读取用户配置目录
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 只预览校验，不生成结果文件
    #[arg(long)]
    preview_only: bool,

    /// 消息语言
    #[arg(long, default_value = "zh-CN")]
    locale: String,
}

impl Cli {
    /// 配置文件选项 + 命令行开关（开关优先）
    fn options(&self) -> Result<AggregationOptions, Box<dyn std::error::Error>> {
        let manager = match &self.config {
            Some(path) => ConfigManager::new(path),
            None => ConfigManager::with_default_path(),
        };
        let mut options = manager.load()?;

        if self.subtotal {
            options.include_daily_subtotal_rows = true;
        }
        if self.grand_total {
            options.include_grand_total_row = true;
        }
        if self.repeat_date {
            options.blank_date_for_detail_rows_when_subtotal_enabled = false;
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    i18n::set_locale(&cli.locale);

    tracing::info!(
        "{} v{} - {}",
        cell_kpi_stats::APP_NAME,
        cell_kpi_stats::VERSION,
        cli.input.display()
    );

    let options = match cli.options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("配置加载失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let api = AggregationApi::new();
    let input = cli.input.to_string_lossy();

    if cli.preview_only {
        return match api.preview(&input).await {
            Ok(result) => {
                print_json(&result);
                if result.required_columns_found {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                eprintln!("[{}] {}", e.code(), e);
                ExitCode::FAILURE
            }
        };
    }

    match api.aggregate(&input, &options).await {
        Ok(result) => {
            print_json(&result);
            if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("[{}] {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("结果序列化失败: {}", e),
    }
}
