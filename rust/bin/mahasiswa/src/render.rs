//! Terminal rendering of screen state.

use anyhow::Result;
use mahasiswa::Mahasiswa;
use mahasiswa::bff::state::RosterState;

use crate::commands::Output;

const HEADERS: [&str; 5] = ["", "NIM", "NAMA", "JURUSAN", "EMAIL"];

fn row(m: &Mahasiswa) -> [String; 5] {
    [
        m.avatar_initial().unwrap_or_default(),
        m.nim.clone(),
        m.nama.clone(),
        m.jurusan.clone(),
        m.email.clone(),
    ]
}

/// Format records as an aligned table.
pub fn table(items: &[Mahasiswa]) -> String {
    let rows: Vec<[String; 5]> = items.iter().map(row).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&HEADERS[..]));
    out.push('\n');
    for r in &rows {
        let cells: Vec<&str> = r.iter().map(String::as_str).collect();
        out.push_str(&line(cells.as_slice()));
        out.push('\n');
    }
    out
}

pub fn roster(state: &RosterState, output: Output) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&state.items)?),
        Output::Table => {
            if state.items.is_empty() {
                println!("Belum ada data mahasiswa. Run `mahasiswa seed` to add sample records.");
                return Ok(());
            }
            println!("Total: {} Mahasiswa", state.items.len());
            print!("{}", table(&state.items));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(nim: &str, nama: &str, jurusan: &str, email: &str) -> Mahasiswa {
        Mahasiswa {
            id: String::new(),
            nim: nim.into(),
            nama: nama.into(),
            jurusan: jurusan.into(),
            email: email.into(),
        }
    }

    #[test]
    fn table_aligns_columns() {
        let out = table(&[
            m("202101003", "Ahmad Rizki", "Teknik Komputer", "ahmad@example.com"),
            m("202101001", "Budi Santoso", "Teknik Informatika", "budi@example.com"),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   NIM"));
        assert!(lines[1].starts_with("A  202101003  Ahmad Rizki   Teknik Komputer"));
        assert!(lines[2].ends_with("budi@example.com"));
    }
}
