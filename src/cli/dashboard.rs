use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::error;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::auth;
use crate::cli::onboarding;
use crate::editor::InvoiceDraft;
use crate::error::Result;
use crate::export;
use crate::models::{display_date, editable_date, filter_by_vendor, Invoice};
use crate::settings::load_settings;
use crate::store::{HttpStore, RecordStore};
use crate::tui::{
    total_span, wrap_text, ALERT_STYLE, FOOTER_STYLE, HEADER_STYLE, LABEL_STYLE, SELECTED_STYLE,
};

/// View state independent of the terminal: the fetched list, the search
/// term, and at most one in-flight edit draft. All store writes flow
/// through here so the in-memory list and the remote documents move
/// together.
pub struct DashboardState {
    pub invoices: Vec<Invoice>,
    pub search: String,
    pub draft: Option<InvoiceDraft>,
    pub status: Option<String>,
}

impl DashboardState {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices,
            search: String::new(),
            draft: None,
            status: None,
        }
    }

    /// The list as currently filtered by the search term.
    pub fn visible(&self) -> Vec<&Invoice> {
        filter_by_vendor(&self.invoices, &self.search)
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        match self.invoices.iter().find(|i| i.id == id) {
            Some(inv) => {
                self.draft = Some(InvoiceDraft::new(inv));
                true
            }
            None => false,
        }
    }

    pub fn close_edit(&mut self) {
        self.draft = None;
    }

    /// Send the draft as a merge patch. On success the list entry is
    /// replaced with the full draft and the edit closes; on failure the
    /// draft stays intact for the caller to keep showing.
    pub fn submit_edit(&mut self, store: &dyn RecordStore) -> Result<()> {
        let Some(draft) = &self.draft else {
            return Ok(());
        };
        let patch = draft.patch()?;
        store.update_invoice(draft.id(), &patch)?;
        let updated = draft.invoice().clone();
        if let Some(entry) = self.invoices.iter_mut().find(|i| i.id == updated.id) {
            *entry = updated;
        }
        self.draft = None;
        Ok(())
    }

    /// One store delete; the entry leaves the local list only on success.
    pub fn delete(&mut self, store: &dyn RecordStore, id: &str) -> Result<()> {
        store.delete_invoice(id)?;
        self.invoices.retain(|i| i.id != id);
        Ok(())
    }
}

const FIXED_FIELDS: usize = 6;
const FIELD_LABELS: [&str; FIXED_FIELDS] =
    ["Proveedor", "Fecha", "N° Factura", "Tipo", "Moneda", "Total"];

/// Text buffers backing the edit dialog. Each keystroke is mirrored into
/// the draft, so the buffers and the draft never diverge.
struct EditForm {
    proveedor: String,
    fecha: String,
    n_factura: String,
    tipo: String,
    moneda: String,
    total: String,
    products: Vec<String>,
    active: usize,
    error: Option<String>,
}

impl EditForm {
    fn from_draft(draft: &InvoiceDraft) -> Self {
        let inv = draft.invoice();
        Self {
            proveedor: inv.proveedor.clone(),
            fecha: editable_date(inv.fecha.as_ref()),
            n_factura: inv.n_factura.clone(),
            tipo: inv.doc_type.clone().unwrap_or_default(),
            moneda: inv.moneda.clone(),
            total: inv.total.to_string(),
            products: inv.products.clone(),
            active: 0,
            error: None,
        }
    }

    fn add_button_index(&self) -> usize {
        FIXED_FIELDS + self.products.len()
    }

    fn save_button_index(&self) -> usize {
        self.add_button_index() + 1
    }

    fn buffer_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.proveedor),
            1 => Some(&mut self.fecha),
            2 => Some(&mut self.n_factura),
            3 => Some(&mut self.tipo),
            4 => Some(&mut self.moneda),
            5 => Some(&mut self.total),
            i => self.products.get_mut(i - FIXED_FIELDS),
        }
    }

    fn buffer(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.proveedor),
            1 => Some(&self.fecha),
            2 => Some(&self.n_factura),
            3 => Some(&self.tipo),
            4 => Some(&self.moneda),
            5 => Some(&self.total),
            i => self.products.get(i - FIXED_FIELDS).map(String::as_str),
        }
    }
}

/// Mirror one edited buffer into the draft.
fn sync_field(state: &mut DashboardState, form: &EditForm, index: usize) {
    let Some(draft) = state.draft.as_mut() else {
        return;
    };
    match index {
        0 => draft.set_proveedor(&form.proveedor),
        1 => draft.set_editable_date(form.fecha.trim()),
        2 => draft.set_n_factura(&form.n_factura),
        3 => draft.set_doc_type(&form.tipo),
        4 => draft.set_moneda(&form.moneda),
        5 => draft.set_total(form.total.trim().parse().unwrap_or(0.0)),
        i => {
            let p = i - FIXED_FIELDS;
            if let Some(value) = form.products.get(p) {
                draft.set_product(p, value);
            }
        }
    }
}

struct ExportDialog {
    from: String,
    to: String,
    active: usize,
    error: Option<String>,
}

enum Mode {
    Normal,
    Search,
    ConfirmDelete { id: String, label: String },
    Edit(EditForm),
    Export(ExportDialog),
}

struct DashboardTui<'a> {
    state: DashboardState,
    store: &'a dyn RecordStore,
    mode: Mode,
    selected: usize,
    table_state: TableState,
}

impl<'a> DashboardTui<'a> {
    fn clamp_selection(&mut self) {
        let len = self.state.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn selected_invoice(&self) -> Option<(String, String)> {
        let visible = self.state.visible();
        visible
            .get(self.selected)
            .map(|inv| (inv.id.clone(), format!("{} ({})", inv.n_factura, inv.proveedor)))
    }

    // -- drawing ----------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // search
            Constraint::Fill(1),   // table
            Constraint::Length(4), // detail
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(frame.area());

        let visible_count = self.state.visible().len();
        frame.render_widget(
            Paragraph::new(format!("Mis Facturas ({visible_count})")).style(HEADER_STYLE),
            areas[0],
        );

        let search_style = if matches!(self.mode, Mode::Search) {
            SELECTED_STYLE
        } else {
            FOOTER_STYLE
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Buscar proveedor: ", LABEL_STYLE),
                Span::styled(self.state.search.clone(), search_style),
            ])),
            areas[1],
        );

        self.draw_table(frame, areas[2]);
        self.draw_detail(frame, areas[3]);

        match &self.mode {
            Mode::ConfirmDelete { label, .. } => {
                frame.render_widget(
                    Paragraph::new(format!("Delete invoice {label}? (y/n)")).style(ALERT_STYLE),
                    areas[4],
                );
            }
            _ => {
                if let Some(status) = &self.state.status {
                    frame.render_widget(Paragraph::new(status.clone()), areas[4]);
                }
            }
        }

        frame.render_widget(
            Paragraph::new("↑↓ move   / search   e edit   d delete   x export   q quit")
                .style(FOOTER_STYLE),
            areas[5],
        );

        match &self.mode {
            Mode::Edit(form) => draw_edit_dialog(frame, form),
            Mode::Export(dialog) => draw_export_dialog(frame, dialog),
            _ => {}
        }
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .state
            .visible()
            .iter()
            .map(|inv| {
                Row::new(vec![
                    Cell::from(display_date(inv.fecha.as_ref())),
                    Cell::from(inv.proveedor.clone()),
                    Cell::from(inv.n_factura.clone()),
                    Cell::from(inv.doc_type.clone().unwrap_or_default()),
                    Cell::from(total_span(inv.total, &inv.moneda)),
                ])
            })
            .collect();

        if rows.is_empty() {
            let message = if self.state.search.is_empty() {
                "No invoices yet. Send an invoice photo to the Telegram bot to see it here."
                    .to_string()
            } else {
                format!("No invoices match \"{}\".", self.state.search)
            };
            frame.render_widget(Paragraph::new(message).style(FOOTER_STYLE), area);
            return;
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Fill(1),
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Length(18),
            ],
        )
        .header(Row::new(vec!["Fecha", "Proveedor", "N° Factura", "Tipo", "Total"]).style(HEADER_STYLE))
        .row_highlight_style(SELECTED_STYLE);

        self.table_state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let visible = self.state.visible();
        let Some(inv) = visible.get(self.selected) else {
            return;
        };
        let products = if inv.products.is_empty() {
            "(none)".to_string()
        } else {
            inv.products.join(", ")
        };
        let (wrapped, _) = wrap_text(&products, area.width.saturating_sub(12) as usize);
        let mut lines = vec![Line::from(vec![
            Span::styled("Total: ", LABEL_STYLE),
            total_span(inv.total, &inv.moneda),
        ])];
        let mut first = true;
        for l in wrapped.lines() {
            if first {
                lines.push(Line::from(vec![
                    Span::styled("Productos: ", LABEL_STYLE),
                    Span::raw(l.to_string()),
                ]));
                first = false;
            } else {
                lines.push(Line::from(format!("           {l}")));
            }
        }
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    // -- input ------------------------------------------------------------

    /// Returns true when the dashboard should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(code),
            Mode::Search => {
                self.handle_search(code);
                false
            }
            Mode::ConfirmDelete { id, label } => {
                self.handle_confirm(code, id, label);
                false
            }
            Mode::Edit(form) => {
                self.handle_edit(code, form);
                false
            }
            Mode::Export(dialog) => {
                self.handle_export(code, dialog);
                false
            }
        }
    }

    fn handle_normal(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => {
                self.selected = usize::MAX;
                self.clamp_selection();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some((id, _)) = self.selected_invoice() {
                    if self.state.open_edit(&id) {
                        if let Some(draft) = &self.state.draft {
                            self.mode = Mode::Edit(EditForm::from_draft(draft));
                        }
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some((id, label)) = self.selected_invoice() {
                    self.mode = Mode::ConfirmDelete { id, label };
                }
            }
            KeyCode::Char('x') => {
                self.mode = Mode::Export(ExportDialog {
                    from: String::new(),
                    to: String::new(),
                    active: 0,
                    error: None,
                });
            }
            _ => {}
        }
        false
    }

    fn handle_search(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => return,
            KeyCode::Backspace => {
                self.state.search.pop();
            }
            KeyCode::Char(c) => self.state.search.push(c),
            _ => {}
        }
        self.selected = 0;
        self.mode = Mode::Search;
    }

    fn handle_confirm(&mut self, code: KeyCode, id: String, label: String) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.state.delete(self.store, &id) {
                    Ok(()) => self.state.status = Some(format!("Deleted {label}.")),
                    Err(e) => {
                        error!("deleting invoice {id}: {e}");
                        self.state.status = Some(format!("Could not delete: {e}"));
                    }
                }
                self.clamp_selection();
            }
            KeyCode::Char('n') | KeyCode::Esc => {}
            _ => {
                // anything else keeps the question up
                self.mode = Mode::ConfirmDelete { id, label };
            }
        }
    }

    fn handle_edit(&mut self, code: KeyCode, mut form: EditForm) {
        match code {
            KeyCode::Esc => {
                self.state.close_edit();
                return;
            }
            KeyCode::Up => form.active = form.active.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => {
                form.active = (form.active + 1).min(form.save_button_index());
            }
            KeyCode::Delete => {
                if (FIXED_FIELDS..form.add_button_index()).contains(&form.active) {
                    let index = form.active - FIXED_FIELDS;
                    form.products.remove(index);
                    if let Some(draft) = self.state.draft.as_mut() {
                        draft.remove_product(index);
                    }
                    form.active = form.active.min(form.save_button_index());
                    form.error = None;
                }
            }
            KeyCode::Enter => {
                if form.active == form.add_button_index() {
                    form.products.push(String::new());
                    if let Some(draft) = self.state.draft.as_mut() {
                        draft.add_product();
                    }
                    form.active = FIXED_FIELDS + form.products.len() - 1;
                } else if form.active == form.save_button_index() {
                    match self.state.submit_edit(self.store) {
                        Ok(()) => {
                            self.state.status = Some("Invoice updated.".to_string());
                            return;
                        }
                        Err(e) => {
                            error!("updating invoice: {e}");
                            form.error = Some(format!("Could not save: {e}"));
                        }
                    }
                } else {
                    form.active += 1;
                }
            }
            KeyCode::Backspace => {
                let active = form.active;
                if let Some(buf) = form.buffer_mut(active) {
                    buf.pop();
                    sync_field(&mut self.state, &form, active);
                    form.error = None;
                }
            }
            KeyCode::Char(c) => {
                let active = form.active;
                if let Some(buf) = form.buffer_mut(active) {
                    buf.push(c);
                    sync_field(&mut self.state, &form, active);
                    form.error = None;
                }
            }
            _ => {}
        }
        self.mode = Mode::Edit(form);
    }

    fn handle_export(&mut self, code: KeyCode, mut dialog: ExportDialog) {
        match code {
            KeyCode::Esc => return,
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                dialog.active = 1 - dialog.active;
            }
            KeyCode::Enter => {
                if dialog.from.trim().is_empty() || dialog.to.trim().is_empty() {
                    dialog.error = Some("Both dates are required.".to_string());
                } else {
                    // Exports the loaded list as-is; no re-fetch.
                    match export::export_to_dir(
                        &self.state.invoices,
                        dialog.from.trim(),
                        dialog.to.trim(),
                        std::path::Path::new("."),
                        false,
                    ) {
                        Ok(path) => {
                            self.state.status = Some(format!("Wrote {}", path.display()));
                            return;
                        }
                        Err(e) => dialog.error = Some(e.to_string()),
                    }
                }
            }
            KeyCode::Backspace => {
                let buf = if dialog.active == 0 {
                    &mut dialog.from
                } else {
                    &mut dialog.to
                };
                buf.pop();
                dialog.error = None;
            }
            KeyCode::Char(c) => {
                let buf = if dialog.active == 0 {
                    &mut dialog.from
                } else {
                    &mut dialog.to
                };
                buf.push(c);
                dialog.error = None;
            }
            _ => {}
        }
        self.mode = Mode::Export(dialog);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let value_style = if active { SELECTED_STYLE } else { ratatui::style::Style::new() };
    Line::from(vec![
        Span::styled(format!("{label:<12}"), LABEL_STYLE),
        Span::styled(value.to_string(), value_style),
        if active {
            Span::styled(" ", SELECTED_STYLE)
        } else {
            Span::raw("")
        },
    ])
}

fn draw_edit_dialog(frame: &mut Frame, form: &EditForm) {
    let mut lines: Vec<Line> = Vec::new();
    for (i, label) in FIELD_LABELS.iter().enumerate() {
        lines.push(field_line(label, form.buffer(i).unwrap_or(""), form.active == i));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Productos", LABEL_STYLE)));
    for (i, product) in form.products.iter().enumerate() {
        lines.push(field_line(
            &format!("  {}.", i + 1),
            product,
            form.active == FIXED_FIELDS + i,
        ));
    }
    let add_style = if form.active == form.add_button_index() {
        SELECTED_STYLE
    } else {
        FOOTER_STYLE
    };
    let save_style = if form.active == form.save_button_index() {
        SELECTED_STYLE
    } else {
        FOOTER_STYLE
    };
    lines.push(Line::from(Span::styled("[ Agregar producto ]", add_style)));
    lines.push(Line::from(Span::styled("[ Guardar cambios ]", save_style)));
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(err.clone(), ALERT_STYLE)));
    }
    lines.push(Line::from(Span::styled(
        "↑↓ move   Del remove product   Enter save   Esc cancel",
        FOOTER_STYLE,
    )));

    let height = (lines.len() + 2) as u16;
    let area = centered_rect(64, height, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Editar Comprobante"),
        ),
        area,
    );
}

fn draw_export_dialog(frame: &mut Frame, dialog: &ExportDialog) {
    let mut lines = vec![
        field_line("Desde", &dialog.from, dialog.active == 0),
        field_line("Hasta", &dialog.to, dialog.active == 1),
    ];
    if let Some(err) = &dialog.error {
        lines.push(Line::from(Span::styled(err.clone(), ALERT_STYLE)));
    }
    lines.push(Line::from(Span::styled(
        "Dates as YYYY-MM-DD   Enter export   Esc cancel",
        FOOTER_STYLE,
    )));

    let height = (lines.len() + 2) as u16;
    let area = centered_rect(52, height, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Exportar Facturas"),
        ),
        area,
    );
}

/// Dashboard entry: resolve the profile first, gate on the linked handle,
/// then load the invoice list and run the interactive view.
pub fn run() -> Result<()> {
    let Some(session) = auth::load_session() else {
        println!("{}", "Not signed in. Run `facturas signin` first.".yellow());
        return Ok(());
    };
    let settings = load_settings();
    let store = HttpStore::new(&settings.store_url, &session.token);

    let linked = match store.get_profile(&session.uid) {
        Ok(profile) => profile.is_some_and(|p| p.has_linked_handle()),
        Err(e) => {
            error!("checking profile: {e}");
            false
        }
    };
    if !linked && !onboarding::run(&store, &session)? {
        println!("Link a Telegram handle to see your invoices here.");
        return Ok(());
    }

    let (invoices, load_error) = match store.list_invoices(&session.uid) {
        Ok(list) => (list, None),
        Err(e) => {
            error!("loading invoices: {e}");
            (Vec::new(), Some(format!("Could not load invoices: {e}")))
        }
    };

    let mut state = DashboardState::new(invoices);
    state.status = load_error;
    let mut app = DashboardTui {
        state,
        store: &store,
        mode: Mode::Normal,
        selected: 0,
        table_state: TableState::default(),
    };

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }
        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                if app.handle_key(key.code) {
                    break Ok(());
                }
            }
            Ok(_) => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoiceDate;
    use crate::store::testing::MemStore;

    fn invoice(id: &str, proveedor: &str, created_at: i64) -> Invoice {
        Invoice {
            id: id.to_string(),
            user_id: "u1".to_string(),
            doc_type: None,
            fecha: Some(InvoiceDate::Text("15/01/2024".to_string())),
            proveedor: proveedor.to_string(),
            n_factura: format!("0001-{id}"),
            total: 100.0,
            moneda: "ARS".to_string(),
            created_at,
            products: vec!["Pan".to_string()],
        }
    }

    fn state_with(store: &MemStore) -> DashboardState {
        DashboardState::new(store.list_invoices("u1").unwrap())
    }

    #[test]
    fn test_visible_respects_search() {
        let store = MemStore::with_invoices(vec![
            invoice("a", "Coto", 3),
            invoice("b", "Carrefour", 2),
        ]);
        let mut state = state_with(&store);
        assert_eq!(state.visible().len(), 2);
        state.search = "coto".to_string();
        let visible = state.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");
    }

    #[test]
    fn test_submit_success_replaces_full_entry_and_closes() {
        let store = MemStore::with_invoices(vec![invoice("a", "Coto", 1)]);
        let mut state = state_with(&store);
        assert!(state.open_edit("a"));
        state.draft.as_mut().unwrap().set_proveedor("Carrefour");
        state.draft.as_mut().unwrap().set_total(250.0);
        state.submit_edit(&store).unwrap();
        assert!(state.draft.is_none());
        assert_eq!(state.invoices[0].proveedor, "Carrefour");
        assert_eq!(state.invoices[0].total, 250.0);
        assert_eq!(*store.update_calls.borrow(), vec!["a".to_string()]);
    }

    #[test]
    fn test_submit_cleared_date_clears_the_store_too() {
        let store = MemStore::with_invoices(vec![invoice("a", "Coto", 1)]);
        let mut state = state_with(&store);
        assert!(state.open_edit("a"));
        state.draft.as_mut().unwrap().set_editable_date("");
        state.submit_edit(&store).unwrap();
        assert_eq!(state.invoices[0].fecha, None);
        // the remote document must not keep the old date
        let stored = store.get_invoice("a").unwrap().unwrap();
        assert_eq!(stored.fecha, None);
    }

    #[test]
    fn test_submit_failure_keeps_list_and_draft() {
        let store = MemStore::with_invoices(vec![invoice("a", "Coto", 1)]);
        let mut state = state_with(&store);
        assert!(state.open_edit("a"));
        state.draft.as_mut().unwrap().set_proveedor("Carrefour");
        store.fail_writes.set(true);
        assert!(state.submit_edit(&store).is_err());
        // list untouched, dialog still open with the draft intact
        assert_eq!(state.invoices[0].proveedor, "Coto");
        assert_eq!(
            state.draft.as_ref().unwrap().invoice().proveedor,
            "Carrefour"
        );
        assert!(store.update_calls.borrow().is_empty());
    }

    #[test]
    fn test_delete_removes_exactly_one_and_calls_store_once() {
        let store = MemStore::with_invoices(vec![
            invoice("a", "Coto", 2),
            invoice("b", "Carrefour", 1),
        ]);
        let mut state = state_with(&store);
        state.delete(&store, "a").unwrap();
        let ids: Vec<&str> = state.invoices.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(*store.delete_calls.borrow(), vec!["a".to_string()]);
    }

    #[test]
    fn test_delete_failure_keeps_list() {
        let store = MemStore::with_invoices(vec![invoice("a", "Coto", 1)]);
        let mut state = state_with(&store);
        store.fail_writes.set(true);
        assert!(state.delete(&store, "a").is_err());
        assert_eq!(state.invoices.len(), 1);
        assert!(store.delete_calls.borrow().is_empty());
    }

    #[test]
    fn test_list_comes_back_newest_first() {
        let store = MemStore::with_invoices(vec![
            invoice("old", "Coto", 1),
            invoice("new", "Coto", 9),
        ]);
        let state = state_with(&store);
        assert_eq!(state.invoices[0].id, "new");
        assert_eq!(state.invoices[1].id, "old");
    }
}
