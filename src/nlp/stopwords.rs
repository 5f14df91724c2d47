//! Combined Chinese/English stopword set (~150 terms per spec §4.4): the
//! union of common function words, social-media noise (reshare/engagement
//! chatter), category labels platforms stamp on every item regardless of
//! topic (e.g. "新闻", "快讯"), and the English function-word tail for
//! mixed-script content (titles routinely splice in English brand/tech
//! terms).

use std::collections::HashSet;

use once_cell::sync::Lazy;

const CHINESE_STOPWORDS: &[&str] = &[
    "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "那", "这个",
    "那个", "这些", "那些", "他", "她", "它", "们", "我们", "你们", "他们", "我的", "你的", "他的",
    "可以", "可能", "应该", "已经", "还是", "但是", "因为", "所以", "如果", "虽然", "而且", "或者",
    "不过", "只是", "觉得", "知道", "什么", "怎么", "为什么", "哪里", "谁", "多少", "几", "一些",
    "非常", "比较", "最", "更", "还", "又", "再", "就是", "其实", "真的", "一直", "一定", "大家",
    "现在", "今天", "昨天", "明天", "目前", "当时", "之后", "之前", "然后", "于是", "对于", "关于",
    "以及", "与", "及", "等", "等等", "之", "其", "此", "该", "各", "每", "某", "所", "被", "把",
    "让", "使", "给", "向", "从", "往", "到", "由", "据", "按", "照", "跟", "同", "并", "且", "则",
    "即", "乃", "吗", "呢", "吧", "啊", "呀", "哦", "嗯", "哈", "这样", "那样", "如此", "怎样",
];

/// Category/channel labels a platform stamps on nearly every item
/// regardless of its actual topic — generic noise for keyword purposes.
const CATEGORY_LABELS: &[&str] = &[
    "新闻", "快讯", "热搜", "热点", "热议", "推荐", "精选", "专题", "资讯", "头条", "独家",
    "今日话题", "实时", "直播", "视频",
];

/// Reshare/engagement chatter that appears in micro-blog and short-video
/// captions independent of content.
const SOCIAL_NOISE: &[&str] = &[
    "转发", "点赞", "评论", "关注", "分享", "收藏", "求关注", "一键三连", "在看", "围观",
    "沙发", "顶", "来了", "走起",
];

const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "to", "of", "and", "or",
    "but", "in", "on", "at", "for", "with", "by", "from", "up", "about", "into", "over", "after",
    "this", "that", "these", "those", "it", "its", "as", "if", "then", "than", "so", "not", "no",
    "do", "does", "did", "can", "could", "will", "would", "should", "may", "might", "must", "i",
    "you", "he", "she", "we", "they", "my", "your", "his", "her", "our", "their", "what", "which",
];

pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    CHINESE_STOPWORDS
        .iter()
        .chain(CATEGORY_LABELS)
        .chain(SOCIAL_NOISE)
        .chain(ENGLISH_STOPWORDS)
        .copied()
        .collect()
});

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token) || STOPWORDS.contains(token.to_lowercase().as_str())
}
