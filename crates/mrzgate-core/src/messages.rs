// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing message catalog.
//
// Every string the flow shows is looked up by key, so one flow serves every
// locale. Unknown locales fall back to English.

/// Keys for every user-visible string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Shown while a submission is in flight.
    Loading,
    /// Heading of the success card.
    SuccessTitle,
    /// Prefix for service failures.
    ErrorPrefix,
    /// Prefix for transport failures.
    ConnectionErrorPrefix,
    /// Reason used when a failure carries no message.
    UnknownError,
    /// Label of the MRZ guide inside the crop box.
    GuideLabel,
    /// Upload area label once a file is chosen. `{name}` is substituted.
    FileSelected,
    /// Upload area prompt.
    ChooseFile,
    /// Verify button.
    VerifyAction,
    /// Button that discards the current selection.
    StartOver,
    /// Capture page heading and tab label.
    VerifyTab,
    /// Settings tab label.
    SettingsTab,
    /// Shown when the capture flow cannot be built.
    CaptureUnavailable,
}

/// A message catalog for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCatalog {
    locale: Locale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Locale {
    En,
    Tr,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self { locale: Locale::En }
    }
}

impl MessageCatalog {
    /// Catalog for a locale tag such as `en`, `tr`, or `tr-TR`.
    pub fn for_locale(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let locale = match primary.as_str() {
            "tr" => Locale::Tr,
            _ => Locale::En,
        };
        Self { locale }
    }

    /// Locale tag actually served.
    pub fn locale(&self) -> &'static str {
        match self.locale {
            Locale::En => "en",
            Locale::Tr => "tr",
        }
    }

    pub fn get(&self, key: MessageKey) -> &'static str {
        match self.locale {
            Locale::En => english(key),
            Locale::Tr => turkish(key),
        }
    }

    /// Upload area label for a chosen file.
    pub fn file_selected(&self, name: &str) -> String {
        self.get(MessageKey::FileSelected).replace("{name}", name)
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Loading => "\u{23F3} Deep scanning in progress, analyzing data...",
        MessageKey::SuccessTitle => "\u{2705} Analysis Successfully Completed",
        MessageKey::ErrorPrefix => "\u{274C} Error",
        MessageKey::ConnectionErrorPrefix => "\u{274C} Connection error",
        MessageKey::UnknownError => "unknown error",
        MessageKey::GuideLabel => "MRZ AREA",
        MessageKey::FileSelected => "\u{2705} {name} selected",
        MessageKey::ChooseFile => "Choose a document photo or drop it here",
        MessageKey::VerifyAction => "Verify",
        MessageKey::StartOver => "Start over",
        MessageKey::VerifyTab => "Verify",
        MessageKey::SettingsTab => "Settings",
        MessageKey::CaptureUnavailable => "Could not start capture",
    }
}

fn turkish(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Loading => "AI do\u{11F}rulama i\u{15F}lemi devam ediyor...",
        MessageKey::SuccessTitle => "\u{2713} Do\u{11F}rulama Ba\u{15F}ar\u{131}l\u{131}",
        MessageKey::ErrorPrefix => "\u{2717} Hata",
        MessageKey::ConnectionErrorPrefix => "\u{2717} Ba\u{11F}lant\u{131} hatas\u{131}",
        MessageKey::UnknownError => "Bilinmeyen hata",
        MessageKey::GuideLabel => "MRZ ALANI",
        MessageKey::FileSelected => "\u{2705} {name} se\u{E7}ildi",
        MessageKey::ChooseFile => "Belge foto\u{11F}raf\u{131} se\u{E7}in veya buraya b\u{131}rak\u{131}n",
        MessageKey::VerifyAction => "Do\u{11F}rula",
        MessageKey::StartOver => "Ba\u{15F}tan ba\u{15F}la",
        MessageKey::VerifyTab => "Do\u{11F}rulama",
        MessageKey::SettingsTab => "Ayarlar",
        MessageKey::CaptureUnavailable => "Tarama ba\u{15F}lat\u{131}lamad\u{131}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_tags_resolve_to_language() {
        assert_eq!(MessageCatalog::for_locale("tr-TR").locale(), "tr");
        assert_eq!(MessageCatalog::for_locale("TR").locale(), "tr");
        assert_eq!(MessageCatalog::for_locale("en_GB").locale(), "en");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let catalog = MessageCatalog::for_locale("de");
        assert_eq!(catalog.get(MessageKey::GuideLabel), "MRZ AREA");
    }

    #[test]
    fn guide_label_is_localized() {
        let catalog = MessageCatalog::for_locale("tr");
        assert_eq!(catalog.get(MessageKey::GuideLabel), "MRZ ALANI");
        assert_eq!(catalog.get(MessageKey::UnknownError), "Bilinmeyen hata");
    }

    #[test]
    fn page_chrome_is_localized() {
        let en = MessageCatalog::default();
        let tr = MessageCatalog::for_locale("tr");
        assert_eq!(en.get(MessageKey::StartOver), "Start over");
        assert_eq!(tr.get(MessageKey::StartOver), "Ba\u{15F}tan ba\u{15F}la");
        assert_eq!(tr.get(MessageKey::SettingsTab), "Ayarlar");
        assert_eq!(tr.get(MessageKey::VerifyTab), "Do\u{11F}rulama");
    }

    #[test]
    fn file_selected_substitutes_name() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.file_selected("doc.jpg"), "\u{2705} doc.jpg selected");
    }
}
