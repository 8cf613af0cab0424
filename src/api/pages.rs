//! Server-rendered HTML for every page the app serves.

use axum::http::StatusCode;

use crate::domain::{AuthUser, Board, BoardColor, BoardWithLists, ListWithCards};
use crate::views::{Alert, CreateBoardForm, TitleForm};

pub const APP_NAME: &str = "TaskFlow";
pub const APP_TAGLINE: &str = "Visual Project Management";
pub const APP_DESCRIPTION: &str = "Organize your projects with boards, lists, and cards";

const STYLE: &str = "body{font-family:Inter,system-ui,sans-serif;margin:0;background:#f9fafb}\
header{display:flex;justify-content:space-between;align-items:center;padding:1rem 2rem}\
.boards{display:grid;grid-template-columns:repeat(auto-fill,minmax(16rem,1fr));gap:1.5rem;padding:2rem}\
.board-tile{display:block;padding:1rem;background:#fff;border-radius:.5rem;text-decoration:none;color:#111}\
.columns{display:flex;gap:1rem;padding:1rem;overflow-x:auto}\
.column{background:#f1f2f4;border-radius:.5rem;padding:.75rem;width:18rem;flex-shrink:0}\
.card{background:#fff;border-radius:.25rem;padding:.75rem;margin-bottom:.5rem}";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<meta name=\"description\" content=\"{}\">\
<title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape(APP_DESCRIPTION),
        escape(title),
        STYLE,
        body
    )
}

fn alert_dialog(alert: Option<&Alert>) -> String {
    alert
        .map(|alert| {
            format!(
                "<dialog open role=\"alertdialog\" class=\"alert\"><p>{}</p>\
<form method=\"dialog\"><button>OK</button></form></dialog>",
                escape(&alert.message)
            )
        })
        .unwrap_or_default()
}

fn user_header(heading: &str, user: &AuthUser, back_link: bool) -> String {
    let back = if back_link {
        "<a href=\"/\">&larr; Back to Boards</a> "
    } else {
        ""
    };

    format!(
        "<header>{}<h1>{}</h1><div><span>Welcome, {}</span>\
<form method=\"post\" action=\"/auth/sign-out\" style=\"display:inline\">\
<button type=\"submit\">Sign Out</button></form></div></header>",
        back,
        escape(heading),
        escape(user.display_name())
    )
}

fn provider_label(provider: &str) -> String {
    let mut chars = provider.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn landing_page(provider: &str) -> String {
    let body = format!(
        "<main style=\"text-align:center;padding-top:20vh\">\
<h1>Welcome to {}</h1><p>{}</p>\
<a class=\"sign-in\" href=\"/auth/sign-in\">Sign in with {}</a></main>",
        escape(APP_NAME),
        escape(APP_DESCRIPTION),
        escape(&provider_label(provider))
    );

    layout(&format!("{APP_NAME} - {APP_TAGLINE}"), &body)
}

fn board_tile(board: &Board) -> String {
    let color = BoardColor::for_board(board.color.as_deref());
    let description = board
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("<p>{}</p>", escape(d)))
        .unwrap_or_default();

    format!(
        "<a class=\"board-tile\" href=\"/board/{}\" style=\"border-top:4px solid {}\">\
<h3>{}</h3>{}<small>Created {}</small></a>",
        escape(&board.id),
        color.hex(),
        escape(&board.title),
        description,
        board.created_at.format("%Y-%m-%d")
    )
}

fn create_board_form(form: &CreateBoardForm) -> String {
    let options: String = BoardColor::all()
        .iter()
        .map(|color| {
            let selected = if form.color == Some(*color) {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                color.as_str(),
                selected,
                provider_label(color.as_str())
            )
        })
        .collect();

    format!(
        "<details{}><summary>+ Create New Board</summary>\
<form method=\"post\" action=\"/boards\">\
<label>Board Title * <input type=\"text\" name=\"title\" value=\"{}\" required></label>\
<label>Description (optional) <textarea name=\"description\" rows=\"3\">{}</textarea></label>\
<label>Color <select name=\"color\"><option value=\"\">Default</option>{}</select></label>\
<button type=\"submit\"{}>Create Board</button></form></details>",
        if form.title.is_empty() { "" } else { " open" },
        escape(&form.title),
        escape(&form.description),
        options,
        if form.is_submitting() { " disabled" } else { "" }
    )
}

pub fn board_list_page(
    user: &AuthUser,
    boards: &[Board],
    form: &CreateBoardForm,
    alert: Option<&Alert>,
) -> String {
    let grid = if boards.is_empty() {
        "<div class=\"empty\"><p>No boards yet</p>\
<p>Create your first board to get started organizing your projects</p></div>"
            .to_string()
    } else {
        let tiles: String = boards.iter().map(board_tile).collect();
        format!("<div class=\"boards\">{tiles}</div>")
    };

    let body = format!(
        "{}<main>{}{}</main>{}",
        user_header("My Boards", user, false),
        create_board_form(form),
        grid,
        alert_dialog(alert)
    );

    layout(&format!("My Boards - {APP_NAME}"), &body)
}

fn card_form(board_id: &str, list_id: &str, draft: Option<&TitleForm>) -> String {
    let title = draft.map(|f| f.title.as_str()).unwrap_or_default();

    format!(
        "<details{}><summary>+ Add a card</summary>\
<form method=\"post\" action=\"/board/{}/lists/{}/cards\">\
<textarea name=\"title\" rows=\"3\" placeholder=\"Enter a title for this card...\" required>{}</textarea>\
<button type=\"submit\">Add Card</button></form></details>",
        if title.is_empty() { "" } else { " open" },
        escape(board_id),
        escape(list_id),
        escape(title)
    )
}

fn column(board_id: &str, list: &ListWithCards, draft: Option<&TitleForm>) -> String {
    let cards: String = list
        .cards
        .iter()
        .map(|card| format!("<div class=\"card\">{}</div>", escape(&card.title)))
        .collect();

    format!(
        "<section class=\"column\"><h3>{}</h3>{}{}</section>",
        escape(&list.list.title),
        cards,
        card_form(board_id, &list.list.id, draft)
    )
}

/// `card_draft` carries a card title that failed to save, keyed by list id,
/// so it can be shown again in the right column.
pub fn board_detail_page(
    user: &AuthUser,
    board: &BoardWithLists,
    list_form: &TitleForm,
    card_draft: Option<(&str, &TitleForm)>,
    alert: Option<&Alert>,
) -> String {
    let board_id = board.board.id.as_str();
    let columns: String = board
        .lists
        .iter()
        .map(|list| {
            let draft = card_draft
                .filter(|(list_id, _)| *list_id == list.list.id)
                .map(|(_, form)| form);
            column(board_id, list, draft)
        })
        .collect();

    let add_list = format!(
        "<section class=\"column\"><details{}><summary>+ Add another list</summary>\
<form method=\"post\" action=\"/board/{}/lists\">\
<input type=\"text\" name=\"title\" value=\"{}\" placeholder=\"Enter list title...\" required>\
<button type=\"submit\">Add List</button></form></details></section>",
        if list_form.title.is_empty() { "" } else { " open" },
        escape(board_id),
        escape(&list_form.title)
    );

    let body = format!(
        "{}<main class=\"columns\">{}{}</main>{}",
        user_header(&board.board.title, user, true),
        columns,
        add_list,
        alert_dialog(alert)
    );

    layout(&format!("{} - {APP_NAME}", board.board.title), &body)
}

pub fn auth_code_error_page() -> String {
    layout(
        &format!("Authentication Error - {APP_NAME}"),
        "<main style=\"text-align:center;padding-top:20vh\"><h1>Authentication Error</h1>\
<p>There was an error during the authentication process.</p><a href=\"/\">Go Home</a></main>",
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<main style=\"text-align:center;padding-top:20vh\"><h1>{}</h1><p>{}</p>\
<a href=\"/\">Go Home</a></main>",
        status.as_u16(),
        escape(message)
    );

    layout(&format!("Error - {APP_NAME}"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".into(),
            email: Some("ada@example.com".into()),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_board_titles_are_escaped() {
        let now = Utc::now();
        let board = Board {
            id: "b1".into(),
            title: "<b>Launch</b>".into(),
            description: Some("Q3 & Q4".into()),
            user_id: "u1".into(),
            color: Some("warning".into()),
            created_at: now,
            updated_at: now,
        };

        let html = board_list_page(&user(), &[board], &CreateBoardForm::default(), None);
        assert!(html.contains("&lt;b&gt;Launch&lt;/b&gt;"));
        assert!(html.contains("Q3 &amp; Q4"));
        assert!(html.contains("#f2d600"));
        assert!(html.contains("href=\"/board/b1\""));
    }

    #[test]
    fn test_empty_board_list() {
        let html = board_list_page(&user(), &[], &CreateBoardForm::default(), None);
        assert!(html.contains("No boards yet"));
        assert!(html.contains("Welcome, ada@example.com"));
        assert!(!html.contains("alertdialog"));
    }

    #[test]
    fn test_alert_keeps_form_values() {
        let form = CreateBoardForm::new("Sprint 1", "two weeks", Some(BoardColor::Info));
        let alert = Alert::new("Failed to create board. Please try again.");

        let html = board_list_page(&user(), &[], &form, Some(&alert));
        assert!(html.contains("alertdialog"));
        assert!(html.contains("Failed to create board. Please try again."));
        assert!(html.contains("value=\"Sprint 1\""));
        assert!(html.contains(">two weeks</textarea>"));
        assert!(html.contains("<option value=\"info\" selected>"));
    }

    #[test]
    fn test_landing_page_offers_sign_in() {
        let html = landing_page("google");
        assert!(html.contains("Welcome to TaskFlow"));
        assert!(html.contains("Sign in with Google"));
        assert!(html.contains("href=\"/auth/sign-in\""));
    }
}
