//! Atom 解析服务 - 业务能力层
//!
//! 只负责"把 arXiv 返回的 Atom 文本变成 PaperRecord 列表"能力

use crate::error::{MalformedEntry, ParseError};
use crate::models::PaperRecord;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use tracing::debug;

/// 单个条目的字段选择方式
#[derive(Debug, Clone, Copy)]
enum Selector {
    /// 路径上第一个元素的文本
    Text(&'static [&'static str]),
    /// 路径上所有元素的文本，按文档顺序
    AllText(&'static [&'static str]),
    /// 第一个 `type` 属性等于给定值的 link 元素的 `href`
    LinkHref(&'static str),
}

/// 字段提取规则
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    field: &'static str,
    selector: Selector,
    required: bool,
}

const ENTRY_RULES: &[FieldRule] = &[
    FieldRule {
        field: "id",
        selector: Selector::Text(&["id"]),
        required: true,
    },
    FieldRule {
        field: "title",
        selector: Selector::Text(&["title"]),
        required: false,
    },
    FieldRule {
        field: "summary",
        selector: Selector::Text(&["summary"]),
        required: false,
    },
    FieldRule {
        field: "published",
        selector: Selector::Text(&["published"]),
        required: false,
    },
    FieldRule {
        field: "authors",
        selector: Selector::AllText(&["author", "name"]),
        required: false,
    },
    FieldRule {
        field: "link",
        selector: Selector::LinkHref("text/html"),
        required: true,
    },
];

/// 解析结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    /// 按文档顺序排列的论文记录
    pub records: Vec<PaperRecord>,
    /// 缺少必填字段而被跳过的条目
    pub skipped: Vec<MalformedEntry>,
}

/// Atom 解析服务
///
/// 职责：
/// - 找出所有 entry 并保持文档顺序
/// - 按 ENTRY_RULES 提取字段
/// - 单个条目缺字段只跳过该条目，不影响其他条目
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析 Atom 文本
    ///
    /// # 参数
    /// - `raw`: API 返回的原始文本
    ///
    /// # 返回
    /// 返回解析出的记录和被跳过的条目；文本不是合法 XML 时返回 `ParseError`
    pub fn parse(&self, raw: &str) -> Result<ParsedFeed, ParseError> {
        let document = read_document(raw)?;

        let mut entries = Vec::new();
        document.collect_named("entry", &mut entries);
        debug!("找到 {} 个 entry", entries.len());

        let mut feed = ParsedFeed::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match extract_entry(index, entry) {
                Ok(record) => feed.records.push(record),
                Err(malformed) => {
                    debug!("跳过条目: {}", malformed);
                    feed.skipped.push(malformed);
                }
            }
        }

        Ok(feed)
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_entry(index: usize, entry: &Element) -> Result<PaperRecord, MalformedEntry> {
    let id_hint = entry
        .find_path(&["id"])
        .map(|e| e.text.trim().to_string())
        .filter(|id| !id.is_empty());

    let mut fields: HashMap<&'static str, Vec<String>> = HashMap::new();
    for rule in ENTRY_RULES {
        let values = rule.selector.select(entry);
        if rule.required && values.iter().all(|v| v.is_empty()) {
            return Err(MalformedEntry {
                index,
                id: id_hint,
                field: rule.field,
            });
        }
        fields.insert(rule.field, values);
    }

    Ok(PaperRecord {
        id: take_first(&mut fields, "id"),
        title: take_first(&mut fields, "title"),
        summary: take_first(&mut fields, "summary"),
        published: take_first(&mut fields, "published"),
        authors: fields.remove("authors").unwrap_or_default(),
        link: take_first(&mut fields, "link"),
    })
}

fn take_first(fields: &mut HashMap<&'static str, Vec<String>>, field: &str) -> String {
    fields
        .remove(field)
        .and_then(|values| values.into_iter().next())
        .unwrap_or_default()
}

impl Selector {
    /// 选出的值都已去掉首尾空白
    fn select(self, entry: &Element) -> Vec<String> {
        match self {
            Selector::Text(path) => entry
                .find_path(path)
                .map(|e| vec![e.text.trim().to_string()])
                .unwrap_or_default(),
            Selector::AllText(path) => {
                let mut found = Vec::new();
                entry.find_all_path(path, &mut found);
                found.into_iter().map(|e| e.text.trim().to_string()).collect()
            }
            Selector::LinkHref(content_type) => entry
                .children_named("link")
                .filter(|link| link.attr("type") == Some(content_type))
                .filter_map(|link| link.attr("href"))
                .map(str::trim)
                .find(|href| !href.is_empty())
                .map(|href| vec![href.to_string()])
                .unwrap_or_default(),
        }
    }
}

// ========== 轻量元素树 ==========

/// 文档元素，名称与属性名都去掉了命名空间前缀
#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    /// 自身及所有后代的文本，按文档顺序拼接
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let attrs = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect();

        Self {
            name,
            attrs,
            ..Default::default()
        }
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn children_named<'a>(&'a self, name: &'static str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn find_path(&self, path: &[&'static str]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children_named(head)
                .find_map(|child| child.find_path(rest)),
        }
    }

    fn find_all_path<'a>(&'a self, path: &[&'static str], out: &mut Vec<&'a Element>) {
        match path.split_first() {
            None => out.push(self),
            Some((head, rest)) => {
                for child in self.children_named(head) {
                    child.find_all_path(rest, out);
                }
            }
        }
    }

    /// 按文档顺序收集所有同名后代，不进入已匹配元素的内部
    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            } else {
                child.collect_named(name, out);
            }
        }
    }
}

fn read_document(raw: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(raw);
    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        let event = reader.read_event().map_err(|source| ParseError::Xml {
            position: reader.buffer_position() as u64,
            source,
        })?;

        match event {
            Event::Start(start) => stack.push(Element::open(&start)),
            Event::Empty(start) => {
                let element = Element::open(&start);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            // 结束标签与开始标签的匹配由 reader 检查，这里只需出栈
            Event::End(_) => {
                debug_assert!(stack.len() > 1, "reader 应拒绝多余的结束标签");
                if stack.len() > 1 {
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(element);
                        }
                    }
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|source| ParseError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                append_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = stack
            .iter()
            .skip(1)
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join("/");
        return Err(ParseError::Truncated { open });
    }

    stack.pop().ok_or(ParseError::Truncated {
        open: String::new(),
    })
}

/// 文本归属于所有未关闭的元素（根节点除外）
fn append_text(stack: &mut [Element], text: &str) {
    for open in stack.iter_mut().skip(1) {
        open.text.push_str(text);
    }
}
