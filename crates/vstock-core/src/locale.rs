//! # Localization
//!
//! French and English labels plus the user notices attached to each ledger
//! operation. French is the default language of the stock workbook.
//!
//! ## Notice Mapping
//! ```text
//! MovementOutcome                         Notices
//! ───────────────────────────────────     ──────────────────────────────────
//! ItemNotFound                        →   warning  "no item found"
//! Applied  In                         →   success  "added N unit(s) for X"
//! Applied  Out, record kept           →   success  "removed N unit(s) for X"
//! Applied  Out, record removed        →   success  "removed N unit(s) for X"
//!                                         info     "X was removed, quantity = 0"
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::ledger::MovementOutcome;
use crate::types::MovementAction;

// =============================================================================
// Language
// =============================================================================

/// Display language for labels and notices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    /// Two-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Localized label of a movement direction, as written in exports.
    pub fn action_label(&self, action: MovementAction) -> &'static str {
        match (self, action) {
            (Language::Fr, MovementAction::In) => "Entrée",
            (Language::Fr, MovementAction::Out) => "Sortie",
            (Language::En, MovementAction::In) => "In",
            (Language::En, MovementAction::Out) => "Out",
        }
    }

    /// Localized yes / no label, used for the tool flag.
    pub fn yes_no(&self, value: bool) -> &'static str {
        match (self, value) {
            (Language::Fr, true) => "Oui",
            (Language::Fr, false) => "Non",
            (Language::En, true) => "Yes",
            (Language::En, false) => "No",
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            _ => Err(ValidationError::NotAllowed {
                field: "language".to_string(),
                allowed: vec!["fr".to_string(), "en".to_string()],
            }),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Notices
// =============================================================================

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NoticeLevel {
    Success,
    Warning,
    Info,
    Error,
}

/// A localized message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Notice {
            level,
            message: message.into(),
        }
    }
}

/// Notices for a movement outcome.
pub fn movement_notices(outcome: &MovementOutcome, lang: Language) -> Vec<Notice> {
    match outcome {
        MovementOutcome::ItemNotFound { .. } => {
            vec![Notice::new(NoticeLevel::Warning, no_item(lang))]
        }
        MovementOutcome::Applied {
            barcode,
            action,
            quantity,
            removed,
            ..
        } => {
            let mut notices = vec![Notice::new(
                NoticeLevel::Success,
                moved(lang, *action, *quantity, barcode),
            )];
            if *removed {
                notices.push(Notice::new(NoticeLevel::Info, removed_item(lang, barcode)));
            }
            notices
        }
    }
}

/// Notice shown after a manual add. The form confirms with a bare check mark
/// in both languages.
pub fn item_added() -> Notice {
    Notice::new(NoticeLevel::Success, "✅")
}

/// Notice shown after a successful import.
pub fn import_success(lang: Language) -> Notice {
    let message = match lang {
        Language::Fr => "✅ Fichier importé avec succès !",
        Language::En => "✅ File imported successfully!",
    };
    Notice::new(NoticeLevel::Success, message)
}

/// Notice shown when an import is rejected.
pub fn import_error(lang: Language, err: &CoreError) -> Notice {
    let prefix = match lang {
        Language::Fr => "Erreur lors de l'import : ",
        Language::En => "Error during import: ",
    };
    Notice::new(NoticeLevel::Error, format!("{prefix}{err}"))
}

fn no_item(lang: Language) -> &'static str {
    match lang {
        Language::Fr => "⚠️ Aucun élément trouvé avec ce code-barres.",
        Language::En => "⚠️ No item found with this barcode.",
    }
}

fn removed_item(lang: Language, barcode: &str) -> String {
    match lang {
        Language::Fr => format!("ℹ️ L'article {barcode} a été supprimé car quantité = 0"),
        Language::En => format!("ℹ️ Item {barcode} was removed because quantity = 0"),
    }
}

fn moved(lang: Language, action: MovementAction, quantity: i64, barcode: &str) -> String {
    match (lang, action) {
        (Language::Fr, MovementAction::In) => {
            format!("✅ Ajout de {quantity} unité(s) pour {barcode}")
        }
        (Language::Fr, MovementAction::Out) => {
            format!("✅ Retrait de {quantity} unité(s) pour {barcode}")
        }
        (Language::En, MovementAction::In) => format!("✅ Added {quantity} unit(s) for {barcode}"),
        (Language::En, MovementAction::Out) => {
            format!("✅ Removed {quantity} unit(s) for {barcode}")
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
