// ==========================================
// 商品目录批量导入 - 导入管道 Trait
// ==========================================
// 职责: 定义解析器与外部参考数据源接口（不包含实现）
// ==========================================

use crate::domain::field::MetaFieldDescriptor;
use crate::domain::reference::ReferenceEntity;
use crate::domain::table::ParsedTable;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件字节 → 表头 + 原始行（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件内容
    ///
    /// # 参数
    /// - payload: 文件字节
    ///
    /// # 返回
    /// - Ok(ParsedTable): 表头 + 非空数据行
    /// - Err: 无法按该格式解码
    fn parse_bytes(&self, payload: &[u8]) -> ImportResult<ParsedTable>;
}

// ==========================================
// ReferenceSource Trait
// ==========================================
// 用途: 会话开始前拉取参考数据（唯一的异步边界）
// 实现者: StaticReferenceSource, JsonFileReferenceSource, 以及外部网络层
// 说明: 超时与重试由实现方负责，核心不做重试
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// 拉取全部分类 {id, name}
    async fn fetch_categories(&self) -> anyhow::Result<Vec<ReferenceEntity>>;

    /// 拉取全部品牌 {id, name}
    async fn fetch_brands(&self) -> anyhow::Result<Vec<ReferenceEntity>>;

    /// 拉取全部供应商 {id, name}
    async fn fetch_vendors(&self) -> anyhow::Result<Vec<ReferenceEntity>>;

    /// 拉取元字段描述 {id, slug, label, fieldType?}
    async fn fetch_meta_fields(&self) -> anyhow::Result<Vec<MetaFieldDescriptor>>;
}
