//! Reply-language detection and synthesis voice selection
//!
//! The synthesis service wants a locale-qualified voice, not a bare language
//! code. Detection yields an ISO 639-3 code; the fixed table below resolves
//! it to a locale and default voice. A detected code absent from the table is
//! a hard `UnsupportedLanguage` failure, never a silent fallback.

use crate::{Error, Result};

/// A synthesis locale and its default voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisVoice {
    /// BCP-47 locale (e.g. "en-US")
    pub locale: &'static str,
    /// Service voice name
    pub name: &'static str,
}

/// Detect the language of `text` and resolve its synthesis voice
///
/// # Errors
///
/// Returns `UnsupportedLanguage` when detection fails or the detected code
/// has no table entry
pub fn voice_for(text: &str) -> Result<SynthesisVoice> {
    let code = whatlang::detect(text)
        .map(|info| info.lang().code())
        .ok_or_else(|| Error::UnsupportedLanguage("undetermined".to_string()))?;
    resolve(code)
}

/// Resolve a detected language code to a synthesis voice
///
/// # Errors
///
/// Returns `UnsupportedLanguage` for codes absent from the table
pub fn resolve(code: &str) -> Result<SynthesisVoice> {
    voice_table(code).ok_or_else(|| Error::UnsupportedLanguage(code.to_string()))
}

/// Fixed mapping from detected language code to synthesis locale and voice
#[allow(clippy::too_many_lines)]
fn voice_table(code: &str) -> Option<SynthesisVoice> {
    let (locale, name) = match code {
        "afr" => ("af-ZA", "af-ZA-AdriNeural"),
        "amh" => ("am-ET", "am-ET-MekdesNeural"),
        "ara" => ("ar-EG", "ar-EG-SalmaNeural"),
        "aze" => ("az-AZ", "az-AZ-BanuNeural"),
        "ben" => ("bn-IN", "bn-IN-TanishaaNeural"),
        "bul" => ("bg-BG", "bg-BG-KalinaNeural"),
        "cat" => ("ca-ES", "ca-ES-JoanaNeural"),
        "ces" => ("cs-CZ", "cs-CZ-VlastaNeural"),
        "cmn" => ("zh-CN", "zh-CN-XiaoxiaoNeural"),
        "dan" => ("da-DK", "da-DK-ChristelNeural"),
        "deu" => ("de-DE", "de-DE-KatjaNeural"),
        "ell" => ("el-GR", "el-GR-AthinaNeural"),
        "eng" => ("en-US", "en-US-JennyNeural"),
        "est" => ("et-EE", "et-EE-AnuNeural"),
        "fin" => ("fi-FI", "fi-FI-SelmaNeural"),
        "fra" => ("fr-FR", "fr-FR-DeniseNeural"),
        "guj" => ("gu-IN", "gu-IN-DhwaniNeural"),
        "heb" => ("he-IL", "he-IL-HilaNeural"),
        "hin" => ("hi-IN", "hi-IN-SwaraNeural"),
        "hrv" => ("hr-HR", "hr-HR-GabrijelaNeural"),
        "hun" => ("hu-HU", "hu-HU-NoemiNeural"),
        "hye" => ("hy-AM", "hy-AM-AnahitNeural"),
        "ind" => ("id-ID", "id-ID-GadisNeural"),
        "ita" => ("it-IT", "it-IT-ElsaNeural"),
        "jav" => ("jv-ID", "jv-ID-SitiNeural"),
        "jpn" => ("ja-JP", "ja-JP-NanamiNeural"),
        "kan" => ("kn-IN", "kn-IN-SapnaNeural"),
        "kat" => ("ka-GE", "ka-GE-EkaNeural"),
        "khm" => ("km-KH", "km-KH-SreymomNeural"),
        "kor" => ("ko-KR", "ko-KR-SunHiNeural"),
        "lav" => ("lv-LV", "lv-LV-EveritaNeural"),
        "lit" => ("lt-LT", "lt-LT-OnaNeural"),
        "mal" => ("ml-IN", "ml-IN-SobhanaNeural"),
        "mar" => ("mr-IN", "mr-IN-AarohiNeural"),
        "mkd" => ("mk-MK", "mk-MK-MarijaNeural"),
        "mya" => ("my-MM", "my-MM-NilarNeural"),
        "nep" => ("ne-NP", "ne-NP-HemkalaNeural"),
        "nld" => ("nl-NL", "nl-NL-ColetteNeural"),
        "nob" => ("nb-NO", "nb-NO-PernilleNeural"),
        "pes" => ("fa-IR", "fa-IR-DilaraNeural"),
        "pol" => ("pl-PL", "pl-PL-ZofiaNeural"),
        "por" => ("pt-BR", "pt-BR-FranciscaNeural"),
        "ron" => ("ro-RO", "ro-RO-AlinaNeural"),
        "rus" => ("ru-RU", "ru-RU-SvetlanaNeural"),
        "sin" => ("si-LK", "si-LK-ThiliniNeural"),
        "slk" => ("sk-SK", "sk-SK-ViktoriaNeural"),
        "slv" => ("sl-SI", "sl-SI-PetraNeural"),
        "spa" => ("es-ES", "es-ES-ElviraNeural"),
        "srp" => ("sr-RS", "sr-RS-SophieNeural"),
        "swe" => ("sv-SE", "sv-SE-SofieNeural"),
        "tam" => ("ta-IN", "ta-IN-PallaviNeural"),
        "tel" => ("te-IN", "te-IN-ShrutiNeural"),
        "tgl" => ("fil-PH", "fil-PH-BlessicaNeural"),
        "tha" => ("th-TH", "th-TH-PremwadeeNeural"),
        "tur" => ("tr-TR", "tr-TR-EmelNeural"),
        "ukr" => ("uk-UA", "uk-UA-PolinaNeural"),
        "urd" => ("ur-PK", "ur-PK-UzmaNeural"),
        "uzb" => ("uz-UZ", "uz-UZ-MadinaNeural"),
        "vie" => ("vi-VN", "vi-VN-HoaiMyNeural"),
        "zul" => ("zu-ZA", "zu-ZA-ThandoNeural"),
        _ => return None,
    };
    Some(SynthesisVoice { locale, name })
}
