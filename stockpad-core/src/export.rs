use crate::inventory::InventoryRecord;

/// Records that share a `product.company`, filtered to the ones worth
/// exporting (`required_count > 0`), in original record order.
#[derive(Debug, Clone)]
pub struct CompanyGroup {
    pub company: String,
    pub records: Vec<InventoryRecord>,
}

impl CompanyGroup {
    /// Groups with no qualifying records are still listed for display but
    /// the copy/share actions are disabled for them.
    pub fn is_exportable(&self) -> bool {
        !self.records.is_empty()
    }

    /// The text handed to the clipboard or the share sheet: one line per
    /// record, `"{name}\t{required}{unit}"`, CRLF-joined.
    pub fn export_text(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}\t{}{}", r.product.name, r.required_count, r.product.unit))
            .collect::<Vec<_>>()
            .join("\r\n")
    }

    /// One-line summary shown next to the company name in the export list.
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}({}{})", r.product.name, r.required_count, r.product.unit))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Group records by company in first-seen order, keeping only records with
/// `required_count > 0` inside each group.
pub fn group_by_company(records: &[InventoryRecord]) -> Vec<CompanyGroup> {
    let mut groups: Vec<CompanyGroup> = Vec::new();
    for record in records {
        let group = match groups.iter_mut().find(|g| g.company == record.product.company) {
            Some(group) => group,
            None => {
                groups.push(CompanyGroup {
                    company: record.product.company.clone(),
                    records: Vec::new(),
                });
                groups.last_mut().unwrap()
            }
        };
        if record.required_count > 0 {
            group.records.push(record.clone());
        }
    }
    groups
}
