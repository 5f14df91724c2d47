//! Rule-based named-entity recognition via closed dictionaries. No
//! statistical model — four small curated lists (locations, organizations,
//! brands, persons) matched by substring, which is all a crawl title needs
//! since entities here only feed category classification and trend
//! labeling, not downstream entity linking.

use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    Location,
    Organization,
    Brand,
    Person,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
}

const LOCATIONS: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "成都", "武汉", "南京", "重庆", "西安", "香港",
    "澳门", "台湾", "新疆", "西藏", "美国", "日本", "韩国", "俄罗斯", "欧盟", "东南亚", "中东",
];

const ORGANIZATIONS: &[&str] = &[
    "国务院", "外交部", "教育部", "央行", "美联储", "联合国", "世卫组织", "证监会", "发改委",
    "人大", "政协", "工信部", "公安部",
];

const BRANDS: &[&str] = &[
    "华为", "腾讯", "阿里巴巴", "字节跳动", "小米", "比亚迪", "宁德时代", "苹果", "谷歌",
    "特斯拉", "英伟达", "微软", "百度", "京东", "美团",
];

const PERSONS: &[&str] = &[
    "马斯克", "马云", "马化腾", "雷军", "任正非", "拜登", "普京",
];

/// One Aho-Corasick automaton per dictionary, built once: a single
/// left-to-right scan finds every occurrence of every entry in that
/// dictionary rather than re-scanning the text once per candidate string.
fn automaton(words: &[&'static str]) -> AhoCorasick {
    AhoCorasick::new(words).expect("entity dictionary compiles to an automaton")
}

static LOCATION_AC: Lazy<AhoCorasick> = Lazy::new(|| automaton(LOCATIONS));
static ORG_AC: Lazy<AhoCorasick> = Lazy::new(|| automaton(ORGANIZATIONS));
static BRAND_AC: Lazy<AhoCorasick> = Lazy::new(|| automaton(BRANDS));
static PERSON_AC: Lazy<AhoCorasick> = Lazy::new(|| automaton(PERSONS));

/// Scan `text` for every known entity across the four dictionaries,
/// returning matches in first-occurrence order with duplicates removed.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for (ac, words, kind) in [
        (&*LOCATION_AC, LOCATIONS, EntityKind::Location),
        (&*ORG_AC, ORGANIZATIONS, EntityKind::Organization),
        (&*BRAND_AC, BRANDS, EntityKind::Brand),
        (&*PERSON_AC, PERSONS, EntityKind::Person),
    ] {
        for mat in ac.find_iter(text) {
            let candidate = words[mat.pattern().as_usize()];
            if seen.insert(candidate) {
                found.push(Entity {
                    text: candidate.to_string(),
                    kind,
                });
            }
        }
    }
    found
}
