use muse_content::ContentError;
use muse_types::UiLocale;
use phf::phf_map;

use crate::error::AppError;

pub const UNEXPECTED: &str = "errors.unexpected";

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "errors.validation" => "Please correct {count} highlighted field(s)",
    "errors.language.duplicate" => "Language {language} is already added",
    "errors.entry.not_found" => "This language version no longer exists",
    "errors.entry.stale_removal" => "This language version was already removed",
    "errors.asset.invalid_key" => "Invalid file name",
    "errors.asset.corrupted" => "File was damaged during upload, please try again",
    "errors.audio.empty" => "Write the audio script first",
    "errors.audio.not_ready" => "Generate the audio preview first",
    "errors.api.unauthorized" => "Your session has expired, please sign in again",
    "errors.api.forbidden" => "You are not allowed to do this",
    "errors.api.not_found" => "Record was not found",
    "errors.api.conflict" => "Record was changed by someone else, reload it and try again",
    "errors.api.server" => "Server is not available, please try again later",
    "errors.api.rejected" => "Server rejected the request",
    "errors.network" => "Cannot reach the server, check your connection and try again",
    "errors.editor.open" => "Close the open editor first",
    "errors.editor.none" => "No editor is open",
    "errors.session.missing" => "Please sign in",
    "errors.unexpected" => "Something went wrong, please try again",
    "prompts.remove_language" => "Remove language version {language}? This cannot be undone.",
    "notices.saved" => "Saved",
    "notices.deleted" => "Deleted",
    "notices.discarded" => "Form was closed, result of the save was not applied",
};

static PL: phf::Map<&'static str, &'static str> = phf_map! {
    "errors.validation" => "Popraw zaznaczone pola ({count})",
    "errors.language.duplicate" => "Język {language} jest już dodany",
    "errors.entry.not_found" => "Ta wersja językowa już nie istnieje",
    "errors.entry.stale_removal" => "Ta wersja językowa została już usunięta",
    "errors.asset.invalid_key" => "Nieprawidłowa nazwa pliku",
    "errors.asset.corrupted" => "Plik został uszkodzony podczas wysyłania, spróbuj ponownie",
    "errors.audio.empty" => "Najpierw wpisz skrypt audio",
    "errors.audio.not_ready" => "Najpierw wygeneruj podgląd audio",
    "errors.api.unauthorized" => "Sesja wygasła, zaloguj się ponownie",
    "errors.api.forbidden" => "Nie masz uprawnień do tej operacji",
    "errors.api.not_found" => "Nie znaleziono rekordu",
    "errors.api.conflict" => "Rekord został zmieniony przez kogoś innego, odśwież go i spróbuj ponownie",
    "errors.api.server" => "Serwer jest niedostępny, spróbuj ponownie później",
    "errors.api.rejected" => "Serwer odrzucił żądanie",
    "errors.network" => "Brak połączenia z serwerem, sprawdź połączenie i spróbuj ponownie",
    "errors.editor.open" => "Najpierw zamknij otwarty edytor",
    "errors.editor.none" => "Żaden edytor nie jest otwarty",
    "errors.session.missing" => "Zaloguj się",
    "errors.unexpected" => "Coś poszło nie tak, spróbuj ponownie",
    "prompts.remove_language" => "Usunąć wersję językową {language}? Tej operacji nie można cofnąć.",
    "notices.saved" => "Zapisano",
    "notices.deleted" => "Usunięto",
    "notices.discarded" => "Formularz został zamknięty, wynik zapisu nie został zastosowany",
};

fn table(locale: UiLocale) -> &'static phf::Map<&'static str, &'static str> {
    match locale {
        UiLocale::En => &EN,
        UiLocale::Pl => &PL,
    }
}

/// Key has a message of its own
pub fn is_known(key: &str) -> bool {
    EN.contains_key(key)
}

/// Message for `key`, falls back to English and then to the generic error message
pub fn text(locale: UiLocale, key: &str) -> &'static str {
    table(locale)
        .get(key)
        .or_else(|| EN.get(key))
        .or_else(|| table(locale).get(UNEXPECTED))
        .copied()
        .unwrap_or("Unexpected error")
}

/// Message with `{name}` placeholders replaced
pub fn format_text(locale: UiLocale, key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(text(locale, key).to_string(), |msg, (name, value)| {
        msg.replace(&format!("{{{name}}}"), value)
    })
}

pub fn localize(locale: UiLocale, error: &AppError) -> String {
    let key = error.message_key();
    match error {
        AppError::Validation(errors) => {
            format_text(locale, key, &[("count", &errors.len().to_string())])
        }
        AppError::Content(ContentError::DuplicateLanguage(language)) => {
            format_text(locale, key, &[("language", language.as_str())])
        }
        _ => text(locale, key).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use muse_client::ClientError;
    use muse_types::LanguageCode;

    use super::*;

    #[test]
    fn test_tables_have_same_keys() {
        for key in EN.keys() {
            assert!(PL.contains_key(key), "missing Polish message {key}");
        }
        assert_eq!(EN.len(), PL.len());
    }

    #[test]
    fn test_localize_duplicate() {
        let error = AppError::Content(ContentError::DuplicateLanguage(LanguageCode::PlPl));
        assert_eq!(
            localize(UiLocale::En, &error),
            "Language pl-PL is already added"
        );
        assert_eq!(localize(UiLocale::Pl, &error), "Język pl-PL jest już dodany");
    }

    #[test]
    fn test_api_message_keys() {
        let error = AppError::Client(ClientError::Api {
            status: 409,
            message: "errors.api.conflict".into(),
        });
        assert!(localize(UiLocale::En, &error).starts_with("Record was changed"));

        let error = AppError::Client(ClientError::Api {
            status: 422,
            message: "errors.exhibit.quota".into(),
        });
        assert_eq!(error.message_key(), "errors.api.rejected");
        assert_eq!(localize(UiLocale::Pl, &error), "Serwer odrzucił żądanie");

        let error = AppError::Client(ClientError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        });
        assert_eq!(
            localize(UiLocale::En, &error),
            "Server is not available, please try again later"
        );
        assert!(error.is_retryable());
    }
}
