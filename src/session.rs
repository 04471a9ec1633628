use rusqlite::Connection;

use crate::db;
use crate::domain::view::ViewState;

const CURRENT_VIEW_KEY: &str = "current_view";

pub fn restore(conn: &Connection) -> rusqlite::Result<ViewState> {
    let stored = db::get_meta(conn, CURRENT_VIEW_KEY)?;
    Ok(ViewState::restore(stored.as_deref()))
}

/// Remembers the selection for the next bare `liftlog` invocation. An
/// empty selection is left unrecorded.
pub fn persist(conn: &Connection, state: ViewState) -> rusqlite::Result<()> {
    match state.selected() {
        Some(view) => db::set_meta(conn, CURRENT_VIEW_KEY, view.as_str()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{persist, restore, CURRENT_VIEW_KEY};
    use crate::db;
    use crate::domain::view::{View, ViewState};

    fn memory_conn() -> rusqlite::Connection {
        db::open_connection(":memory:").expect("in-memory db should open")
    }

    #[test]
    fn fresh_session_starts_on_planner() {
        let conn = memory_conn();
        assert_eq!(
            restore(&conn).expect("restore should work").selected(),
            Some(View::Planner)
        );
    }

    #[test]
    fn selection_survives_reopen() {
        let conn = memory_conn();
        let mut state = ViewState::default();
        state.select(View::Insights);
        persist(&conn, state).expect("persist should work");
        assert_eq!(
            restore(&conn).expect("restore should work").selected(),
            Some(View::Insights)
        );
    }

    #[test]
    fn corrupted_selection_renders_nothing() {
        let conn = memory_conn();
        db::set_meta(&conn, CURRENT_VIEW_KEY, "dashboard").expect("set should work");
        let state = restore(&conn).expect("restore should work");
        assert_eq!(state.selected(), None);

        persist(&conn, state).expect("persist should work");
        assert_eq!(
            db::get_meta(&conn, CURRENT_VIEW_KEY).expect("meta should read"),
            Some("dashboard".to_string())
        );
    }
}
