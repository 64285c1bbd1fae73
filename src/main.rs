// ==========================================
// 商品目录批量导入 - 命令行入口
// ==========================================
// 流程: 解析文件 → 拉取参考数据 → 应用映射 → 行转换 → 输出草稿载荷
// 输出: {"summary": {...}, "drafts": [...]}（stdout 或 --output 文件）
// ==========================================

use anyhow::{Context, Result};
use catalog_import::config::{default_config_path, ImportConfig};
use catalog_import::importer::{ImportSession, JsonFileReferenceSource, UniversalFileParser};
use catalog_import::{logging, DraftProduct, FileFormat};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalog-import", version, about = "表格文件 → 商品草稿")]
struct Cli {
    /// 待导入文件（.csv / .xlsx / .xls / .ods）
    #[arg(short, long)]
    file: PathBuf,

    /// 映射 JSON: {"表头": "字段键"}，值为 null 表示不导入
    #[arg(short, long)]
    mapping: PathBuf,

    /// 参考数据 JSON: {"categories", "brands", "vendors", "metaFields"}
    #[arg(short, long)]
    reference: PathBuf,

    /// 指定文件格式（缺省按扩展名判断）
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// 导入配置 JSON（缺省读取系统配置目录）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 警告消息语言（zh-CN / en）
    #[arg(long)]
    locale: Option<String>,

    /// 输出文件（缺省 stdout）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Spreadsheet,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => FileFormat::DelimitedText,
            FormatArg::Spreadsheet => FileFormat::Spreadsheet,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    if let Some(path) = path {
        return Ok(ImportConfig::from_json_file(path)?);
    }

    match default_config_path().filter(|p| p.exists()) {
        Some(path) => {
            info!(path = %path.display(), "使用系统配置目录中的导入配置");
            Ok(ImportConfig::from_json_file(path)?)
        }
        None => Ok(ImportConfig::default()),
    }
}

async fn load_mapping(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("读取映射文件失败: {}", path.display()))?;
    let mapping: BTreeMap<String, Option<String>> = serde_json::from_str(&raw)
        .with_context(|| format!("映射文件格式错误: {}", path.display()))?;

    Ok(mapping
        .into_iter()
        .filter_map(|(header, key)| key.map(|k| (header, k)))
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }
    info!("{} v{}", catalog_import::APP_NAME, catalog_import::VERSION);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }

    // 阶段 0: 解析文件
    let parser = UniversalFileParser::from_config(&config);
    let table = match cli.format {
        Some(format) => parser.parse_path_as(&cli.file, format.into())?,
        None => parser.parse_path(&cli.file)?,
    };

    // 阶段 1: 会话开始（参考数据）+ 映射
    let source = JsonFileReferenceSource::new(&cli.reference);
    let mut session = ImportSession::start(table, &source, config).await?;

    let mapping = load_mapping(&cli.mapping).await?;
    session.set_all_mappings(mapping.iter().map(|(h, k)| (h.as_str(), k.as_str())))?;

    // 阶段 2: 行转换
    session.transform()?;

    let summary = session.summary();
    for (kind, names) in session.staging()?.pending_creations() {
        info!(kind = %kind, count = names.len(), names = ?names, "待创建引用");
    }
    info!(
        total_rows = summary.total_rows,
        drafts = summary.drafts,
        rows_with_warnings = summary.rows_with_warnings,
        warnings = summary.warnings,
        "导入完成"
    );

    let drafts: Vec<Value> = session
        .into_drafts()?
        .iter()
        .map(DraftProduct::to_payload)
        .collect();
    let rendered = serde_json::to_string_pretty(&json!({
        "summary": summary,
        "drafts": drafts,
    }))?;

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("写入输出失败: {}", path.display()))?;
            info!(path = %path.display(), "草稿已写出");
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
