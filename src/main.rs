use clap::Parser;
use class_seating::adapters::report;
use class_seating::core::ConfigProvider;
use class_seating::utils::error::ErrorSeverity;
use class_seating::utils::{logger, validation::Validate};
use class_seating::{CliConfig, LocalStorage, RosterPipeline, SeatingEngine};

fn main() {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting class-seating");
    tracing::debug!("CLI args: {:?}", args);

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let labels = config.categories().clone();
    let pipeline = RosterPipeline::new(LocalStorage::default(), config);
    let engine = SeatingEngine::new(pipeline);

    match engine.run() {
        Ok(run) => {
            print!("{}", report::render(&run.outcome, &labels));
            println!("📁 分组结果已导出到: {}", run.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Seating run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
