//! Prompt templating for narrative generation.

use std::sync::LazyLock;

use regex::Regex;

static TURKISH_LETTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[çğıöşüÇĞİÖŞÜ]").expect("valid letter pattern")
});

static TURKISH_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(bir|ve|bu|şu|ile|için|gibi|var|yok|çok|az)\b")
        .expect("valid word pattern")
});

/// Language the story is written in, inferred from the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Default
    English,
    /// Prompt contains Turkish letters or common Turkish words
    Turkish,
}

impl Language {
    /// Infer the language of `prompt`.
    pub fn detect(prompt: &str) -> Self {
        if TURKISH_LETTERS.is_match(prompt) || TURKISH_WORDS.is_match(prompt) {
            Language::Turkish
        } else {
            Language::English
        }
    }
}

/// System prompt for a generation call.
///
/// With parent context, English prompts ask for a continuation and Turkish
/// prompts ask for a single merged story that retells the parent.
pub fn system_prompt(language: Language, parent_context: Option<&str>, prompt: &str) -> String {
    match language {
        Language::English => english_system_prompt(parent_context),
        Language::Turkish => turkish_system_prompt(parent_context, prompt),
    }
}

/// User message for a generation call.
pub fn user_message(language: Language, prompt: &str) -> String {
    match language {
        Language::English => prompt.to_string(),
        Language::Turkish => format!("Lütfen tamamen TÜRKÇE bir hikaye yaz:\n\n{}", prompt),
    }
}

fn english_system_prompt(parent_context: Option<&str>) -> String {
    let context = match parent_context {
        Some(parent) => format!(
            "CONTEXT FROM PREVIOUS NODE:\n---\n{}\n---\n\n\
             Build on this context and keep the story continuous.",
            parent
        ),
        None => "This opens a new story. Start with a hook that pulls the reader in.".to_string(),
    };

    format!(
        "You are the storyteller of ChainMuse, a collaborative branching-narrative platform.\n\n\
         STYLE:\n\
         - Vivid, immersive prose with concrete sensory detail\n\
         - Emotional depth and believable characters\n\
         - 150-200 words\n\n\
         STRUCTURE:\n\
         - Continue naturally from any previous context\n\
         - Introduce a new plot element or character development\n\
         - End on an open question that invites another branch\n\n\
         {}\n\n\
         Write the entire response in English.",
        context
    )
}

fn turkish_system_prompt(parent_context: Option<&str>, prompt: &str) -> String {
    let task = match parent_context {
        Some(parent) => format!(
            "BİRLEŞTİRME GÖREVİ:\n\
             Önceki yazarın hikayesini yeni devam isteğiyle birleştirerek tek ve bütün bir hikaye yaz.\n\n\
             ÖNCEKİ HİKAYE:\n---\n{}\n---\n\n\
             YENİ DEVAM İSTEĞİ:\n\"{}\"\n\n\
             Önceki hikayeyi kendi üslubunla baştan anlat, yeni fikri doğal biçimde ekle \
             ve 250-350 kelimelik tek bir anlatı oluştur.",
            parent, prompt
        ),
        None => "Bu yeni bir hikayenin başlangıcı. Okuyucuyu yakalayan bir giriş yaz. 150-200 kelime."
            .to_string(),
    };

    format!(
        "Sen ChainMuse adlı işbirlikçi hikaye platformunun hikaye anlatıcısısın.\n\n\
         {}\n\n\
         YAZIM STİLİ:\n\
         - Canlı ve sürükleyici anlatım\n\
         - Zengin betimlemeler ve duygusal derinlik\n\
         - Devamını merak ettiren bir son\n\n\
         Yanıtının tamamını doğal, akıcı TÜRKÇE ile yaz.",
        task
    )
}
