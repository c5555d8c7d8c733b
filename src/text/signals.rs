//! Bilingual (English/Chinese) signal patterns over candidate text.
//!
//! Compiled once as process-wide constants. Categories are deliberately
//! heuristic: they partition text well enough for scoring, with the LLM
//! judge covering the borderline band.

use regex::Regex;
use std::sync::LazyLock;

/// Named signal category carried by a piece of candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCategory {
    /// Name/origin/occupation statements ("my name is…", "我叫…")
    PersonalProfile,
    /// Possession/relationship statements ("I have a dog", "我有…")
    PersonalOwnership,
    /// Likes and habits ("I like tea", "我喜欢…")
    PersonalPreference,
    /// Instructions about how the assistant should behave
    AssistantStyle,
    /// Dated / "today, yesterday" references
    Transient,
    /// Shell-command-like text
    Procedural,
    /// Imperative requests addressed to the assistant
    RequestStyle,
}

static PERSONAL_PROFILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(my name is|i['’]?m called|i am called|call me|people call me|i work (as|at|for)|i['’]m an? |i am an? |i live in|i grew up in|i was born|i come from|i['’]m from|i am from|my job is|my occupation is)|我叫|我的名字|我姓|我是|我来自|我住在|我老家|我的职业|我从事|今年\d+岁",
    )
    .expect("personal-profile pattern")
});

static PERSONAL_OWNERSHIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(i have (a|an|two|three|\d+) |i own |i['’]ve got (a|an) |my (wife|husband|partner|son|daughter|kid|kids|dog|cat|car|house|apartment|company|startup|team|boss))|我有|我养|我的(老婆|妻子|丈夫|儿子|女儿|孩子|小孩|狗|猫|车|房子|公司|团队|老板)",
    )
    .expect("personal-ownership pattern")
});

static PERSONAL_PREFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(i (really |rather |always |usually )?(like|love|enjoy|prefer|hate|dislike)|my favou?rite|i usually|i always|i never|i often|i tend to|i['’]m used to)\b|我(特别|很|非常|比较|最)?(喜欢|爱喝|爱吃|爱|讨厌|偏好|习惯)|我(经常|总是|从不|通常|一般|平时)",
    )
    .expect("personal-preference pattern")
});

static ASSISTANT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(from now on|in (future|your) (replies|answers)|when (you )?(reply|respond|answer)|please (always|never)|always (reply|respond|answer|use)|never (reply|respond|answer|use)|(reply|respond|answer) in (english|chinese|short|bullet)|keep (your )?(answers|replies))\b|以后(请)?(用|都|回答|回复)|请(用|说)(中文|英文)|回答(的时候|时)|回复(的时候|时)|称呼我|叫我.*(就好|就行)|语气(正式|随意)一?点|(简短|详细)一(点|些)",
    )
    .expect("assistant-style pattern")
});

static TRANSIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(today|tonight|yesterday|tomorrow|this (morning|afternoon|evening|week|weekend|month)|last (night|week)|next week|right now|just now|at the moment|currently)\b|今天|今晚|昨天|明天|后天|现在|刚才|刚刚|这周|本周|下周|这个月|本月|周末|\d{1,2}月\d{1,2}日|\d{4}年|\d{1,2}:\d{2}",
    )
    .expect("transient pattern")
});

static PROCEDURAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(\$ |#!|sudo |git |npm |pnpm |yarn |pip3? |cargo |docker |kubectl |curl |wget |cd |ls |cat |grep |rm |mkdir |brew |apt |apt-get |python3? |node )|--[A-Za-z][A-Za-z0-9-]+|&&|\|\||\.sh\b|\.py\b|\.exe\b",
    )
    .expect("procedural pattern")
});

static REQUEST_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(please\b|pls\b|kindly\b|can you\b|could you\b|would you\b|help me\b|show me\b|tell me\b|give me\b|find\b|write\b|generate\b|translate\b|summarize\b|explain\b|check\b|look up\b)|^\s*(请|帮我|帮忙|麻烦|给我|查一?下|看一?下)",
    )
    .expect("request-style pattern")
});

static SMALL_TALK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(hi|hello|hey|yo|thanks( a lot)?|thank you|ok(ay)?|cool|great|good (morning|afternoon|evening|night)|bye|see you|lol|haha+|你好|您好|嗨|哈喽|谢谢|多谢|好的|嗯+|哈哈+|再见|拜拜|晚安|早)\s*[!！.。~～,，]*\s*$",
    )
    .expect("small-talk pattern")
});

static ASSISTANT_VOICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(as an ai|i['’]m an ai|i can help( you)?|i['’]d be happy to|here['’]s (what|how)|let me know if|feel free to|is there anything else)\b|作为(一个)?(ai|人工智能|助手|智能助手)|我可以帮(你|您)|很高兴为(你|您)|有什么(可以|能)帮",
    )
    .expect("assistant-voice pattern")
});

static NON_DURABLE_TOPIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(i have (a|an) (problem|issue|error|question)|there['’]s (a|an) (problem|issue|error)|(doesn['’]t|does not|won['’]t|will not|can['’]t|cannot) work|throws? (an )?(error|exception)|stack ?trace)\b|报错|出错|出现(了)?(问题|异常|错误)|遇到(了)?(问题|报错|异常|错误)|有个?(问题|疑问)|异常|错误|无法(运行|启动|使用|打开)",
    )
    .expect("non-durable-topic pattern")
});

static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(source|input( file)?|output( file)?|file(name)?|path|url|link|来源|输入(文件)?|输出(文件)?|文件名?|路径|链接)\s*[:：]",
    )
    .expect("metadata-line pattern")
});

static REQUEST_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[,，;；]?\s*(can you\b|could you\b|please (help|check|look|tell)|help me (check|find|look)|请帮我?|帮我(查|看|找)|麻烦帮|给我查)",
    )
    .expect("request-tail pattern")
});

static QUESTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(who|what|when|where|why|how|which|whose|whom|can (you|i|we)|could (you|i|we)|would (you|i)|will (you|it)|should (i|we)|do (you|i|we)|does|did (you|it)|is (it|there|this|that)|are (you|there|we)|am i)\b|^\s*(什么|谁|哪|几|多少|怎么|怎样|如何|为什么|为何|是否|难道|要不要|能不能|可不可以|有没有)",
    )
    .expect("question-prefix pattern")
});

static EMBEDDED_INTERROGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(yes or no|or not)\b|是不是|有没有|能不能|会不会|好不好|行不行|对不对|可不可以|要不要")
        .expect("embedded-interrogative pattern")
});

static FINAL_QUESTION_PARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[吗呢么][\s。．.!！~～]*$").expect("final-question-particle pattern")
});

impl SignalCategory {
    pub fn matches(self, text: &str) -> bool {
        let pattern: &Regex = match self {
            Self::PersonalProfile => &PERSONAL_PROFILE,
            Self::PersonalOwnership => &PERSONAL_OWNERSHIP,
            Self::PersonalPreference => &PERSONAL_PREFERENCE,
            Self::AssistantStyle => &ASSISTANT_STYLE,
            Self::Transient => &TRANSIENT,
            Self::Procedural => &PROCEDURAL,
            Self::RequestStyle => &REQUEST_STYLE,
        };
        pattern.is_match(text)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalProfile => "personal-profile",
            Self::PersonalOwnership => "personal-ownership",
            Self::PersonalPreference => "personal-preference",
            Self::AssistantStyle => "assistant-style",
            Self::Transient => "transient",
            Self::Procedural => "procedural",
            Self::RequestStyle => "request-style",
        }
    }
}

/// Personal-profile / ownership / preference — the "this is durably about
/// the user" signals.
pub fn has_factual_signal(text: &str) -> bool {
    SignalCategory::PersonalProfile.matches(text)
        || SignalCategory::PersonalOwnership.matches(text)
        || SignalCategory::PersonalPreference.matches(text)
}

/// Implicit-add priority: first matching category wins, highest first.
pub fn implicit_priority(text: &str) -> Option<(SignalCategory, f64)> {
    const PRIORITIES: &[(SignalCategory, f64)] = &[
        (SignalCategory::PersonalProfile, 0.93),
        (SignalCategory::PersonalOwnership, 0.90),
        (SignalCategory::PersonalPreference, 0.88),
        (SignalCategory::AssistantStyle, 0.86),
    ];
    PRIORITIES
        .iter()
        .find(|(category, _)| category.matches(text))
        .copied()
}

pub fn is_small_talk(text: &str) -> bool {
    SMALL_TALK.is_match(text)
}

/// Text that reads like the assistant talking, not a fact about the user.
/// Distinct from [`SignalCategory::AssistantStyle`], which is a *user
/// preference* about assistant behavior and is storable.
pub fn is_assistant_voice(text: &str) -> bool {
    ASSISTANT_VOICE.is_match(text)
}

pub fn is_non_durable_topic(text: &str) -> bool {
    NON_DURABLE_TOPIC.is_match(text)
}

pub fn is_metadata_line(text: &str) -> bool {
    METADATA_LINE.is_match(text)
}

/// Byte offset where a trailing request transition begins ("…, can you
/// help me"), if any. Offset 0 means the whole fragment is a request and
/// there is nothing worth clipping.
pub fn request_tail_start(text: &str) -> Option<usize> {
    REQUEST_TAIL.find(text).map(|m| m.start()).filter(|&idx| idx > 0)
}

pub(super) fn question_prefix(text: &str) -> bool {
    QUESTION_PREFIX.is_match(text)
}

pub(super) fn embedded_interrogative(text: &str) -> bool {
    EMBEDDED_INTERROGATIVE.is_match(text)
}

pub(super) fn final_question_particle(text: &str) -> bool {
    FINAL_QUESTION_PARTICLE.is_match(text)
}
