//! Line-oriented presentation layer: two views bound to the store.
//!
//! The Inventory view edits counts and writes through on every edit; the
//! Settings view edits a local product draft that only reaches the store on
//! an explicit save. Everything runs synchronously on the calling thread.

use std::io::{BufRead, Write};

use stockpad_core::table::{self, Column, EditKind};
use stockpad_core::{group_by_company, Product};
use stockpad_store::{Store, StoreError};

const NUMBER: EditKind = EditKind::Number {
    allow_negative: false,
};

const INVENTORY_COLUMNS: [Column; 3] = [
    Column::new("name/company", "name", EditKind::ReadOnly),
    Column::new("remain", "remain", NUMBER),
    Column::new("required", "required", NUMBER),
];

const PRODUCT_COLUMNS: [Column; 3] = [
    Column::new("name", "name", EditKind::Text),
    Column::new("company", "company", EditKind::Text),
    Column::new("unit", "unit", EditKind::Text),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Inventory,
    Settings,
}

pub struct App {
    store: Store,
    view: View,
    product_draft: Vec<Product>,
}

impl App {
    pub fn new(store: Store) -> Self {
        let product_draft = store.products().to_vec();
        Self {
            store,
            view: View::Inventory,
            product_draft,
        }
    }

    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
        self.render(out)?;
        let mut line = String::new();
        loop {
            write!(out, "{}> ", self.prompt())?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if !self.dispatch(line.trim(), input, out)? {
                break;
            }
        }
        Ok(())
    }

    fn prompt(&self) -> &'static str {
        match self.view {
            View::Inventory => "inventory",
            View::Settings => "settings",
        }
    }

    /// Returns false when the user quits.
    fn dispatch(
        &mut self,
        line: &str,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> anyhow::Result<bool> {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(command) => command,
            None => return Ok(true),
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "q" | "quit" => return Ok(false),
            "h" | "help" => self.render_help(out)?,
            "i" | "inventory" => {
                self.view = View::Inventory;
                self.render(out)?;
            }
            "s" | "settings" => {
                self.view = View::Settings;
                self.render(out)?;
            }
            "l" | "list" => self.render(out)?,
            _ => match self.view {
                View::Inventory => self.dispatch_inventory(command, &args, input, out)?,
                View::Settings => self.dispatch_settings(command, &args, input, out)?,
            },
        }
        Ok(true)
    }

    fn dispatch_inventory(
        &mut self,
        command: &str,
        args: &[&str],
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        match (command, args) {
            ("set", [row, column, value]) => {
                self.edit_count(row, column, CountEdit::Set(value), out)?;
            }
            ("inc", [row, column]) => {
                self.edit_count(row, column, CountEdit::Step(1), out)?;
            }
            ("dec", [row, column]) => {
                self.edit_count(row, column, CountEdit::Step(-1), out)?;
            }
            ("reset", []) => {
                if confirm(
                    "Remaining/required counts will be reset to 0. Reset?",
                    input,
                    out,
                )? {
                    self.apply_store(out, Store::reset_counts)?;
                    self.render(out)?;
                }
            }
            ("export", []) => self.render_export_list(out)?,
            ("copy", [group]) | ("share", [group]) => {
                self.export_group(command, group, out)?;
            }
            _ => writeln!(out, "unknown command; try 'help'")?,
        }
        Ok(())
    }

    fn dispatch_settings(
        &mut self,
        command: &str,
        args: &[&str],
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        match (command, args) {
            ("set", [row, column, rest @ ..]) => {
                let Some(index) = parse_row(row, self.product_draft.len()) else {
                    writeln!(out, "no such row: {row}")?;
                    return Ok(());
                };
                let value = rest.join(" ");
                let product = &mut self.product_draft[index];
                match PRODUCT_COLUMNS.iter().find(|c| c.key == *column) {
                    Some(col) if col.kind == EditKind::Text => match col.key {
                        "name" => product.name = value,
                        "company" => product.company = value,
                        "unit" => product.unit = value,
                        _ => unreachable!(),
                    },
                    _ => {
                        writeln!(out, "no editable column: {column}")?;
                        return Ok(());
                    }
                }
                self.render(out)?;
            }
            ("add", []) => {
                self.product_draft.push(Product::draft());
                self.render(out)?;
            }
            ("del", [row]) => {
                match parse_row(row, self.product_draft.len())
                    .and_then(|i| table::remove_row(&mut self.product_draft, i))
                {
                    Some(removed) => writeln!(out, "removed '{}'", removed.name)?,
                    None => writeln!(out, "no such row: {row}")?,
                }
                self.render(out)?;
            }
            ("move", [from, to]) => {
                let len = self.product_draft.len();
                match (parse_row(from, len), parse_row(to, len)) {
                    (Some(from), Some(to)) => {
                        table::move_row(&mut self.product_draft, from, to);
                        self.render(out)?;
                    }
                    _ => writeln!(out, "rows out of range")?,
                }
            }
            ("save", []) => {
                let draft = self.product_draft.clone();
                self.apply_store(out, move |store| store.save_products(draft))?;
                self.product_draft = self.store.products().to_vec();
                self.render(out)?;
            }
            ("reload", []) => {
                if confirm("Unsaved edits will revert to the last save. Reload?", input, out)? {
                    self.product_draft = self.store.products().to_vec();
                    self.render(out)?;
                }
            }
            _ => writeln!(out, "unknown command; try 'help'")?,
        }
        Ok(())
    }

    fn edit_count(
        &mut self,
        row: &str,
        column: &str,
        edit: CountEdit<'_>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let mut records = self.store.inventories().to_vec();
        let Some(index) = parse_row(row, records.len()) else {
            writeln!(out, "no such row: {row}")?;
            return Ok(());
        };
        let allow_negative = match INVENTORY_COLUMNS.iter().find(|c| c.key == column) {
            Some(Column {
                kind: EditKind::Number { allow_negative },
                ..
            }) => *allow_negative,
            _ => {
                writeln!(out, "no numeric column: {column}")?;
                return Ok(());
            }
        };

        let record = &mut records[index];
        let current = match column {
            "remain" => &mut record.remain_count,
            _ => &mut record.required_count,
        };
        *current = match edit {
            CountEdit::Set(raw) => table::coerce_count(raw, allow_negative),
            CountEdit::Step(delta) => table::step_count(*current, delta, allow_negative),
        };

        // Count edits write through, as the inventory table always has.
        self.apply_store(out, move |store| store.save_inventories(records))?;
        self.render(out)?;
        Ok(())
    }

    /// Run a mutating store operation; write failures are warned about and
    /// otherwise ignored, per the non-blocking notification policy.
    fn apply_store(
        &mut self,
        out: &mut impl Write,
        op: impl FnOnce(&mut Store) -> Result<stockpad_store::Snapshot, StoreError>,
    ) -> anyhow::Result<()> {
        if let Err(e) = op(&mut self.store) {
            tracing::warn!(error = %e, "store write failed");
            writeln!(out, "warning: {e}")?;
        }
        Ok(())
    }

    fn render(&self, out: &mut impl Write) -> anyhow::Result<()> {
        match self.view {
            View::Inventory => {
                render_header(out, &INVENTORY_COLUMNS)?;
                for (i, record) in self.store.inventories().iter().enumerate() {
                    writeln!(
                        out,
                        "{i:>3}  {}/{}\t{}{u}\t{}{u}",
                        record.product.name,
                        record.product.company,
                        record.remain_count,
                        record.required_count,
                        u = record.product.unit,
                    )?;
                }
            }
            View::Settings => {
                render_header(out, &PRODUCT_COLUMNS)?;
                for (i, product) in self.product_draft.iter().enumerate() {
                    writeln!(
                        out,
                        "{i:>3}  {}\t{}\t{}",
                        product.name, product.company, product.unit
                    )?;
                }
            }
        }
        Ok(())
    }

    fn render_export_list(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let groups = group_by_company(self.store.inventories());
        if groups.is_empty() {
            writeln!(out, "nothing to export")?;
            return Ok(());
        }
        for (i, group) in groups.iter().enumerate() {
            if group.is_exportable() {
                writeln!(out, "{i:>3}  {}: {}", group.company, group.summary())?;
            } else {
                writeln!(out, "{i:>3}  {}: (nothing required)", group.company)?;
            }
        }
        writeln!(out, "use 'copy <n>' or 'share <n>'")?;
        Ok(())
    }

    fn export_group(&self, action: &str, group: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let groups = group_by_company(self.store.inventories());
        let Some(group) = parse_row(group, groups.len()).map(|i| &groups[i]) else {
            writeln!(out, "no such group")?;
            return Ok(());
        };
        if !group.is_exportable() {
            writeln!(out, "{}: nothing required, export disabled", group.company)?;
            return Ok(());
        }
        // Clipboard and the OS share sheet are outside this binary; the text
        // block is emitted for the terminal to pick up.
        writeln!(out, "--- {} ({}) ---", group.company, action)?;
        writeln!(out, "{}", group.export_text())?;
        writeln!(out, "---")?;
        Ok(())
    }

    fn render_help(&self, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(out, "views: inventory (i), settings (s); list (l), help, quit")?;
        writeln!(out, "inventory: set <row> remain|required <n>, inc/dec <row> <col>,")?;
        writeln!(out, "           reset, export, copy <group>, share <group>")?;
        writeln!(out, "settings:  set <row> name|company|unit <text>, add, del <row>,")?;
        writeln!(out, "           move <from> <to>, save, reload")?;
        Ok(())
    }
}

/// How a numeric cell changes: typed input or a ±1 stepper press.
enum CountEdit<'a> {
    Set(&'a str),
    Step(i64),
}

fn render_header(out: &mut impl Write, columns: &[Column]) -> anyhow::Result<()> {
    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    writeln!(out, "  #  {}", headers.join("\t"))?;
    Ok(())
}

fn parse_row(arg: &str, len: usize) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|&i| i < len)
}

fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> anyhow::Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use stockpad_core::Product;
    use stockpad_store::{MemoryKv, Store};

    fn seeded_store() -> Store {
        let (mut store, _) = Store::open(Box::new(MemoryKv::new()));
        store
            .save_products(vec![Product {
                id: 1,
                name: "Flour".to_string(),
                company: "Miller Co".to_string(),
                unit: "kg".to_string(),
                visible: true,
            }])
            .unwrap();
        store
    }

    fn run_script(store: Store, script: &str) -> (App, String) {
        let mut app = App::new(store);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        app.run(&mut input, &mut out).unwrap();
        (app, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_settings_add_and_save_creates_inventory_record() {
        let (store, _) = Store::open(Box::new(MemoryKv::new()));
        let script = "s\nadd\nset 0 name Flour\nset 0 company Miller Co\nset 0 unit kg\nsave\n";
        let (app, _) = run_script(store, script);

        assert_eq!(app.store.products().len(), 1);
        assert_eq!(app.store.products()[0].name, "Flour");
        assert_eq!(app.store.products()[0].company, "Miller Co");
        assert_eq!(app.store.inventories().len(), 1);
        assert_eq!(app.store.inventories()[0].required_count, 0);
    }

    #[test]
    fn test_inventory_edits_write_through() {
        let (app, _) = run_script(seeded_store(), "set 0 required 3\ninc 0 remain\n");
        assert_eq!(app.store.inventories()[0].required_count, 3);
        assert_eq!(app.store.inventories()[0].remain_count, 1);
    }

    #[test]
    fn test_non_numeric_input_coerces_to_zero() {
        let (app, _) = run_script(seeded_store(), "set 0 required 3\nset 0 required abc\n");
        assert_eq!(app.store.inventories()[0].required_count, 0);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (app, _) = run_script(seeded_store(), "set 0 required 3\nreset\nn\n");
        assert_eq!(app.store.inventories()[0].required_count, 3);

        let (app, _) = run_script(seeded_store(), "set 0 required 3\nreset\ny\n");
        assert_eq!(app.store.inventories()[0].required_count, 0);
    }

    #[test]
    fn test_export_copy_emits_group_text() {
        let (_, output) = run_script(seeded_store(), "set 0 required 2\nexport\ncopy 0\n");
        assert!(output.contains("Miller Co: Flour(2kg)"));
        assert!(output.contains("Flour\t2kg"));
    }

    #[test]
    fn test_settings_reload_discards_edits() {
        let script = "s\nset 0 name Renamed\nreload\ny\nsave\n";
        let (app, _) = run_script(seeded_store(), script);
        assert_eq!(app.store.products()[0].name, "Flour");
    }

    #[test]
    fn test_settings_delete_and_save_drops_record() {
        let (app, _) = run_script(seeded_store(), "s\ndel 0\nsave\n");
        assert!(app.store.products().is_empty());
        assert!(app.store.inventories().is_empty());
    }
}
