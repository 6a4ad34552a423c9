//! Localized summaries for the supported audio languages.
//!
//! Translation is template based: each language has a fixed phrasebook and
//! the verdict subject is interpolated as-is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::models::{CompanyAnalysis, Verdict, VerdictKind};

const MAX_SUMMARY_TOPICS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Telugu,
    Hindi,
    English,
    Malayalam,
    Tamil,
    Kannada,
}

impl Language {
    /// Menu order; the menu key is the 1-based position
    pub const ALL: [Language; 6] = [
        Language::Telugu,
        Language::Hindi,
        Language::English,
        Language::Malayalam,
        Language::Tamil,
        Language::Kannada,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::English => "English",
            Language::Malayalam => "Malayalam",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
        }
    }

    /// ISO 639-1 code, also used by the speech endpoint
    pub fn code(&self) -> &'static str {
        match self {
            Language::Telugu => "te",
            Language::Hindi => "hi",
            Language::English => "en",
            Language::Malayalam => "ml",
            Language::Tamil => "ta",
            Language::Kannada => "kn",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Language for a menu choice ("1" to "6")
    pub fn from_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    fn phrasebook(&self) -> &'static Phrasebook {
        match self {
            Language::Telugu => &TELUGU,
            Language::Hindi => &HINDI,
            Language::English => &ENGLISH,
            Language::Malayalam => &MALAYALAM,
            Language::Tamil => &TAMIL,
            Language::Kannada => &KANNADA,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = AnalysisError;

    /// Accepts a language code, an English name, or a menu number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .or_else(|| Self::from_choice(s))
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            })
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(s.to_string()))
    }
}

struct Phrasebook {
    heading: &'static str,
    analyzed: &'static str,
    positive: &'static str,
    negative: &'static str,
    neutral: &'static str,
    overall: &'static str,
    main_topics: &'static str,
    no_common_topics: &'static str,
    /// (prefix, suffix) around the verdict subject, in `VerdictKind` order
    verdicts: [(&'static str, &'static str); 5],
}

const ENGLISH: Phrasebook = Phrasebook {
    heading: "News analysis for {company}:",
    analyzed: "We have analyzed {count} news articles.",
    positive: "Positive articles",
    negative: "Negative articles",
    neutral: "Neutral articles",
    overall: "Overall analysis",
    main_topics: "Main topics",
    no_common_topics: "No common topics found",
    // English verdicts come straight from the comparison stage
    verdicts: [("", ""); 5],
};

const TELUGU: Phrasebook = Phrasebook {
    heading: "{company} గురించి వార్తా విశ్లేషణ:",
    analyzed: "మేము {count} వార్తా కథనాలను విశ్లేషించాము.",
    positive: "సానుకూల వార్తలు",
    negative: "ప్రతికూల వార్తలు",
    neutral: "తటస్థ వార్తలు",
    overall: "మొత్తం విశ్లేషణ",
    main_topics: "ప్రధాన అంశాలు",
    no_common_topics: "సామాన్య అంశాలు కనుగొనబడలేదు",
    verdicts: [
        ("వార్తలు ప్రధానంగా సానుకూలంగా ఉన్నాయి. ", " గురించి సానుకూల వార్తలు ప్రత్యేకంగా గమనార్హమైనవి."),
        ("వార్తలు గణనీయమైన ఆందోళనలను చూపిస్తున్నాయి, ముఖ్యంగా ", " విషయంలో."),
        ("వార్తలు జాగ్రత్తగా సానుకూలంగా ఉన్నాయి, కొన్ని ఆందోళనలు ", " గురించి గమనించబడ్డాయి."),
        ("వార్తలు ప్రతికూలంగా మొగ్గు చూపుతున్నాయి, అయినప్పటికీ ", " లో కొన్ని సానుకూల పరిణామాలు ఉన్నాయి."),
        ("వార్తలు మిశ్రమంగా లేదా తటస్థంగా ఉన్నాయి, ", " పై సంతులిత దృక్కోణాలతో."),
    ],
};

const HINDI: Phrasebook = Phrasebook {
    heading: "{company} के बारे में समाचार विश्लेषण:",
    analyzed: "हमने {count} समाचार लेखों का विश्लेषण किया है।",
    positive: "सकारात्मक लेख",
    negative: "नकारात्मक लेख",
    neutral: "तटस्थ लेख",
    overall: "समग्र विश्लेषण",
    main_topics: "मुख्य विषय",
    no_common_topics: "कोई सामान्य विषय नहीं मिला",
    verdicts: [
        ("कवरेज मुख्य रूप से सकारात्मक है। ", " के बारे में सकारात्मक खबरें विशेष रूप से उल्लेखनीय हैं।"),
        ("कवरेज महत्वपूर्ण चिंताओं को दर्शाता है, विशेष रूप से ", " के संबंध में।"),
        ("कवरेज सावधानीपूर्वक सकारात्मक है, कुछ चिंताएं ", " के बारे में नोट की गई हैं।"),
        ("कवरेज नकारात्मक झुकाव वाला है, हालांकि ", " में कुछ सकारात्मक विकास हैं।"),
        ("कवरेज मिश्रित या तटस्थ है, ", " पर संतुलित दृष्टिकोण के साथ।"),
    ],
};

const MALAYALAM: Phrasebook = Phrasebook {
    heading: "{company} എന്നതിനെക്കുറിച്ചുള്ള വാർത്താ വിശകലനം:",
    analyzed: "ഞങ്ങൾ {count} വാർത്താ ലേഖനങ്ങൾ വിശകലനം ചെയ്തു.",
    positive: "പോസിറ്റീവ് ലേഖനങ്ങൾ",
    negative: "നെഗറ്റീവ് ലേഖനങ്ങൾ",
    neutral: "നിഷ്പക്ഷ ലേഖനങ്ങൾ",
    overall: "സമഗ്ര വിശകലനം",
    main_topics: "പ്രധാന വിഷയങ്ങൾ",
    no_common_topics: "പൊതുവായ വിഷയങ്ങളൊന്നും കണ്ടെത്തിയില്ല",
    verdicts: [
        ("കവറേജ് പ്രധാനമായും പോസിറ്റീവാണ്. ", " എന്നതിനെക്കുറിച്ചുള്ള പോസിറ്റീവ് വാർത്തകൾ പ്രത്യേകിച്ച് ശ്രദ്ധേയമാണ്."),
        ("വാർത്താ കവറേജ് ഗണ്യമായ ആശങ്കകൾ കാണിക്കുന്നു, പ്രത്യേകിച്ച് ", " സംബന്ധിച്ച്."),
        ("കവറേജ് ജാഗ്രതയോടെ പോസിറ്റീവാണ്, ", " എന്നതിനെക്കുറിച്ച് ചില ആശങ്കകൾ രേഖപ്പെടുത്തിയിട്ടുണ്ട്."),
        ("കവറേജ് നെഗറ്റീവിലേക്ക് ചായുന്നു, എന്നിരുന്നാലും ", " എന്നതിൽ ചില പോസിറ്റീവ് പുരോഗതികളുണ്ട്."),
        ("കവറേജ് മിശ്രിതമോ നിഷ്പക്ഷമോ ആണ്, ", " എന്നതിനെക്കുറിച്ച് സന്തുലിതമായ കാഴ്ചപ്പാടുകളോടെ."),
    ],
};

const TAMIL: Phrasebook = Phrasebook {
    heading: "{company} பற்றிய செய்தி பகுப்பாய்வு:",
    analyzed: "நாங்கள் {count} செய்தி கட்டுரைகளை ஆய்வு செய்துள்ளோம்.",
    positive: "நேர்மறை கட்டுரைகள்",
    negative: "எதிர்மறை கட்டுரைகள்",
    neutral: "நடுநிலை கட்டுரைகள்",
    overall: "ஒட்டுமொத்த பகுப்பாய்வு",
    main_topics: "முக்கிய தலைப்புகள்",
    no_common_topics: "பொதுவான தலைப்புகள் எதுவும் கண்டுபிடிக்கப்படவில்லை",
    verdicts: [
        ("உள்ளடக்கம் பெரும்பாலும் நேர்மறையானது. ", " பற்றிய நேர்மறை செய்திகள் குறிப்பிடத்தக்கவை."),
        ("செய்தி உள்ளடக்கம் குறிப்பிடத்தக்க கவலைகளைக் காட்டுகிறது, குறிப்பாக ", " தொடர்பாக."),
        ("உள்ளடக்கம் எச்சரிக்கையுடன் நேர்மறையாக உள்ளது, ", " பற்றி சில கவலைகள் குறிப்பிடப்பட்டுள்ளன."),
        ("உள்ளடக்கம் எதிர்மறையாக சாய்கிறது, இருப்பினும் ", " இல் சில நேர்மறையான முன்னேற்றங்கள் உள்ளன."),
        ("உள்ளடக்கம் கலப்பு அல்லது நடுநிலையாக உள்ளது, ", " பற்றிய சமநிலையான கண்ணோட்டங்களுடன்."),
    ],
};

const KANNADA: Phrasebook = Phrasebook {
    heading: "{company} ಕುರಿತು ಸುದ್ದಿ ವಿಶ್ಲೇಷಣೆ:",
    analyzed: "ನಾವು {count} ಸುದ್ದಿ ಲೇಖನಗಳನ್ನು ವಿಶ್ಲೇಷಿಸಿದ್ದೇವೆ.",
    positive: "ಸಕಾರಾತ್ಮಕ ಲೇಖನಗಳು",
    negative: "ನಕಾರಾತ್ಮಕ ಲೇಖನಗಳು",
    neutral: "ತಟಸ್ಥ ಲೇಖನಗಳು",
    overall: "ಒಟ್ಟಾರೆ ವಿಶ್ಲೇಷಣೆ",
    main_topics: "ಪ್ರಮುಖ ವಿಷಯಗಳು",
    no_common_topics: "ಯಾವುದೇ ಸಾಮಾನ್ಯ ವಿಷಯಗಳು ಕಂಡುಬಂದಿಲ್ಲ",
    verdicts: [
        ("ವರದಿಯು ಪ್ರಮುಖವಾಗಿ ಸಕಾರಾತ್ಮಕವಾಗಿದೆ. ", " ಬಗ್ಗೆ ಸಕಾರಾತ್ಮಕ ಸುದ್ದಿಗಳು ವಿಶೇಷವಾಗಿ ಗಮನಾರ್ಹವಾಗಿವೆ."),
        ("ವರದಿಯು ಗಣನೀಯ ಕಳವಳಗಳನ್ನು ತೋರಿಸುತ್ತದೆ, ವಿಶೇಷವಾಗಿ ", " ಕುರಿತು."),
        ("ವರದಿಯು ಎಚ್ಚರಿಕೆಯಿಂದ ಸಕಾರಾತ್ಮಕವಾಗಿದೆ, ", " ಬಗ್ಗೆ ಕೆಲವು ಕಳವಳಗಳನ್ನು ಗಮನಿಸಲಾಗಿದೆ."),
        ("ವರದಿಯು ನಕಾರಾತ್ಮಕತೆಯ ಕಡೆಗೆ ವಾಲುತ್ತದೆ, ಆದರೂ ", " ನಲ್ಲಿ ಕೆಲವು ಸಕಾರಾತ್ಮಕ ಬೆಳವಣಿಗೆಗಳಿವೆ."),
        ("ವರದಿಯು ಮಿಶ್ರಿತ ಅಥವಾ ತಟಸ್ಥವಾಗಿದೆ, ", " ಕುರಿತು ಸಮತೋಲಿತ ದೃಷ್ಟಿಕೋನಗಳೊಂದಿಗೆ."),
    ],
};

fn verdict_index(kind: VerdictKind) -> usize {
    match kind {
        VerdictKind::PredominantlyPositive => 0,
        VerdictKind::SignificantConcerns => 1,
        VerdictKind::CautiouslyPositive => 2,
        VerdictKind::LeansNegative => 3,
        VerdictKind::MixedOrNeutral => 4,
    }
}

/// Verdict sentence in the target language.
pub fn translate_verdict(verdict: &Verdict, language: Language) -> String {
    if language == Language::English {
        return verdict.text.clone();
    }

    let (prefix, suffix) = language.phrasebook().verdicts[verdict_index(verdict.kind)];
    format!("{}{}{}", prefix, verdict.subject, suffix)
}

/// Spoken summary of an analysis in the target language.
pub fn translate_summary(analysis: &CompanyAnalysis, language: Language) -> String {
    let book = language.phrasebook();
    let distribution = &analysis.report.sentiment_distribution;
    let common_topics = &analysis.report.topic_overlap.common_topics;

    let topics_text = if common_topics.is_empty() {
        book.no_common_topics.to_string()
    } else {
        common_topics
            .iter()
            .take(MAX_SUMMARY_TOPICS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let heading = book.heading.replace("{company}", &analysis.company);
    let analyzed = book
        .analyzed
        .replace("{count}", &analysis.articles.len().to_string());

    [
        heading,
        String::new(),
        analyzed,
        String::new(),
        format!("{}: {}", book.positive, distribution.positive),
        format!("{}: {}", book.negative, distribution.negative),
        format!("{}: {}", book.neutral, distribution.neutral),
        String::new(),
        format!(
            "{}: {}",
            book.overall,
            translate_verdict(&analysis.report.overall_verdict, language)
        ),
        String::new(),
        format!("{}: {}", book.main_topics, topics_text),
    ]
    .join("\n")
}
