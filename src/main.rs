use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use paper_summariser::models::find_by_title;
use paper_summariser::utils::logging;
use paper_summariser::{
    build_prompt, CategoryRegistry, Config, PaperRecord, Pipeline, PipelineError, QaClient,
    StoreError, TechnicalLevel,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "paper_summariser", version, about = "获取 arXiv 最新论文并请求问答服务总结")]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出所有可选分类
    Categories,

    /// 获取某个分类的最新论文并保存
    Fetch {
        /// 分类显示名称，如 "Machine Learning"
        category: String,
        #[arg(long)]
        max_results: Option<u32>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// 获取论文后，请问答服务按指定水平总结其中一篇
    Ask {
        category: String,
        /// 按标题选择论文
        #[arg(long, conflicts_with = "index")]
        paper: Option<String>,
        /// 按序号选择论文（从 1 开始）
        #[arg(long)]
        index: Option<usize>,
        #[arg(long, value_enum, default_value_t = TechnicalLevel::Basic)]
        level: TechnicalLevel,
        #[arg(long)]
        max_results: Option<u32>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Command::Categories => {
            for (name, code) in CategoryRegistry::entries() {
                println!("{:<8} {}", code, name);
            }
            Ok(())
        }
        Command::Fetch {
            category,
            max_results,
            output_dir,
        } => {
            apply_overrides(&mut config, max_results, output_dir);
            logging::log_startup(&config);

            let (records, store_error) = fetch_papers(&config, &category).await?;
            for record in &records {
                println!("{}", record.title);
            }
            match store_error {
                Some(e) => Err(e).context("论文未能保存"),
                None => Ok(()),
            }
        }
        Command::Ask {
            category,
            paper,
            index,
            level,
            max_results,
            output_dir,
        } => {
            apply_overrides(&mut config, max_results, output_dir);
            logging::log_startup(&config);

            let (records, store_error) = fetch_papers(&config, &category).await?;
            if let Some(e) = store_error {
                warn!("⚠️ 论文未能保存，继续使用内存中的结果: {}", e);
            }
            if records.is_empty() {
                bail!("分类 {} 没有获取到论文", category);
            }

            let selected = select_paper(&records, paper.as_deref(), index)?;
            info!("📝 选中论文: {}", selected.title);

            let prompt = build_prompt(selected, level);
            let client = QaClient::new(&config)?;
            let reply = client
                .ask(&prompt)
                .await
                .with_context(|| format!("无法调用问答服务: {}", client.endpoint()))?;

            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut Config, max_results: Option<u32>, output_dir: Option<PathBuf>) {
    if let Some(n) = max_results {
        config.max_results = n;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
}

/// 运行流水线
///
/// 保存失败时仍然返回论文，错误单独返回
async fn fetch_papers(
    config: &Config,
    category: &str,
) -> Result<(Vec<PaperRecord>, Option<StoreError>)> {
    let pipeline = Pipeline::from_config(config)?;

    match pipeline.run(category, config.max_results).await {
        Ok(records) => {
            logging::log_papers(&records);
            Ok((records, None))
        }
        Err(PipelineError::Category(e)) => {
            error!("❌ {}", e);
            bail!("{}，可用分类请运行 `paper_summariser categories`", e)
        }
        Err(PipelineError::Store { records, source }) => {
            logging::log_papers(&records);
            Ok((records, Some(source)))
        }
    }
}

fn select_paper<'a>(
    records: &'a [PaperRecord],
    title: Option<&str>,
    index: Option<usize>,
) -> Result<&'a PaperRecord> {
    match (title, index) {
        (Some(title), _) => {
            find_by_title(records, title).with_context(|| format!("没有标题为 \"{}\" 的论文", title))
        }
        (None, Some(index)) => index
            .checked_sub(1)
            .and_then(|i| records.get(i))
            .with_context(|| format!("序号 {} 超出范围 [1, {}]", index, records.len())),
        (None, None) => records.first().context("论文列表为空"),
    }
}
