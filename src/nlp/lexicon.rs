//! The ~40-term custom domain lexicon spec §4.4 calls for: multi-character
//! nouns that a generic maximum-matching segmenter would otherwise split
//! into meaningless single characters (e.g. "大模型" → "大"/"模型"). Seeded
//! once into the tokenizer's mutable dictionary; callers can register more
//! via `Tokenizer::learn`.

pub const DOMAIN_LEXICON: &[&str] = &[
    "人工智能", "大模型", "芯片", "新能源汽车", "元宇宙", "区块链", "国产软件", "机器人",
    "自动驾驶", "云计算", "大数据", "物联网", "半导体", "光伏", "储能", "数字货币",
    "人民币汇率", "股市", "楼市", "房价", "两会", "外交部", "中美关系", "国务院", "人大",
    "双减", "高考", "医疗改革", "社会保障", "食品安全", "天气预警", "美联储", "黄金价格",
    "中央银行", "数字经济", "碳中和", "共同富裕", "乡村振兴", "一带一路", "粤港澳大湾区",
    "长三角一体化",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_has_around_40_entries() {
        assert!(DOMAIN_LEXICON.len() >= 35 && DOMAIN_LEXICON.len() <= 45);
    }

    #[test]
    fn every_entry_is_multi_character() {
        assert!(DOMAIN_LEXICON.iter().all(|w| w.chars().count() >= 2));
    }
}
