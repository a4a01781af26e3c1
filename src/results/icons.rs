//! Icon and thumbnail reference resolution

use crate::account::Account;
use url::Url;

pub const TALK_ICON: &str = "qrc:///client/theme/black/wizard-talk.svg";
pub const EDIT_ICON: &str = "qrc:///client/theme/black/edit.svg";
pub const CALENDAR_ICON: &str = "qrc:///client/theme/black/calendar.svg";
pub const EMAIL_ICON: &str = "qrc:///client/theme/black/email.svg";
pub const ACCOUNT_ICON: &str = "qrc:///client/theme/account.svg";

const BUILTIN_FOLDER: &str = ":/client/theme/black/folder.svg";
const BUILTIN_DECK: &str = ":/client/theme/black/deck.svg";
const BUILTIN_CALENDAR: &str = ":/client/theme/black/calendar.svg";
const BUILTIN_EMAIL: &str = ":/client/theme/black/email.svg";

/// Separator between thumbnail and icon in the icons field
pub const IMAGE_SEPARATOR: char = ';';

/// Placeholder image shown while a row's own images load
pub fn placeholder_for(provider_id: &str) -> &'static str {
    if provider_id.contains("message") || provider_id.contains("talk") {
        TALK_ICON
    } else if provider_id.contains("file") {
        EDIT_ICON
    } else if provider_id.contains("calendar") {
        CALENDAR_ICON
    } else if provider_id.contains("mail") {
        EMAIL_ICON
    } else if provider_id.contains("comment") {
        ACCOUNT_ICON
    } else {
        ""
    }
}

fn is_path_like(reference: &str) -> bool {
    reference.contains('/') || reference.contains('\\')
}

fn has_scheme(reference: &str) -> bool {
    Url::parse(reference).is_ok_and(|url| !url.scheme().is_empty())
}

/// Resolve an entry icon.
///
/// Relative paths resolve against the server; opaque keywords map onto
/// built-in icons or become blank.
pub fn resolve_icon(icon: &str, account: &Account) -> String {
    if has_scheme(icon) {
        return icon.to_string();
    }
    if is_path_like(icon) {
        return account.resolve_path(icon);
    }

    let builtin = if icon.contains("folder") {
        BUILTIN_FOLDER
    } else if icon.contains("deck") {
        BUILTIN_DECK
    } else if icon.contains("calendar") {
        BUILTIN_CALENDAR
    } else if icon.contains("mail") {
        BUILTIN_EMAIL
    } else {
        ""
    };
    builtin.to_string()
}

/// Resolve an entry thumbnail; only relative paths are rewritten
pub fn resolve_thumbnail(thumbnail: &str, account: &Account) -> String {
    if is_path_like(thumbnail) && !has_scheme(thumbnail) {
        account.resolve_path(thumbnail)
    } else {
        thumbnail.to_string()
    }
}

/// Join thumbnail and icon into one field, thumbnail first
pub fn join_images(thumbnail: &str, icon: &str) -> String {
    format!("{}{}{}", thumbnail, IMAGE_SEPARATOR, icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(Url::parse("https://cloud.example.com/").unwrap(), "alice")
    }

    #[test]
    fn test_placeholder_classification() {
        assert_eq!(placeholder_for("talk-message"), TALK_ICON);
        assert_eq!(placeholder_for("files"), EDIT_ICON);
        assert_eq!(placeholder_for("calendar"), CALENDAR_ICON);
        assert_eq!(placeholder_for("mail"), EMAIL_ICON);
        assert_eq!(placeholder_for("comments"), ACCOUNT_ICON);
        assert_eq!(placeholder_for("deck"), "");
    }

    #[test]
    fn test_absolute_icon_kept() {
        let icon = "https://avatars.example.com/u/1.png";
        assert_eq!(resolve_icon(icon, &account()), icon);
    }

    #[test]
    fn test_relative_icon_resolved_with_query() {
        assert_eq!(
            resolve_icon("/apps/theming/img/core/filetypes/folder.svg?v=3", &account()),
            "https://cloud.example.com/apps/theming/img/core/filetypes/folder.svg?v=3"
        );
    }

    #[test]
    fn test_keyword_icons() {
        let account = account();
        assert_eq!(resolve_icon("icon-folder", &account), BUILTIN_FOLDER);
        assert_eq!(resolve_icon("icon-deck", &account), BUILTIN_DECK);
        assert_eq!(resolve_icon("icon-calendar-dark", &account), BUILTIN_CALENDAR);
        assert_eq!(resolve_icon("icon-mail", &account), BUILTIN_EMAIL);
        assert_eq!(resolve_icon("icon-contacts", &account), "");
        assert_eq!(resolve_icon("", &account), "");
    }

    #[test]
    fn test_thumbnail_resolution() {
        let account = account();
        assert_eq!(
            resolve_thumbnail("/core/preview?fileId=42&x=32&y=32", &account),
            "https://cloud.example.com/core/preview?fileId=42&x=32&y=32"
        );
        assert_eq!(resolve_thumbnail("", &account), "");
        assert_eq!(
            resolve_thumbnail("https://cdn.example.com/t.png", &account),
            "https://cdn.example.com/t.png"
        );
    }

    #[test]
    fn test_join_images() {
        assert_eq!(join_images("thumb.png", "icon.svg"), "thumb.png;icon.svg");
        assert_eq!(join_images("", ""), ";");
    }
}
