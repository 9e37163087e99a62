use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    generate_spell_catalog(&out_dir);

    println!("cargo:rerun-if-changed=data/spells.csv");
}

fn generate_spell_catalog(out_dir: &str) {
    let csv = fs::read_to_string("data/spells.csv").expect("failed to read spells.csv");

    // BTreeMap for deterministic output (sorted by key)
    let mut entries = BTreeMap::new();
    for line in csv.lines().skip(1) {
        let Some((id, name)) = line.split_once(',') else {
            continue;
        };
        let id: u64 = match id.trim().parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        entries.entry(id).or_insert(name.replace('"', "\\\""));
    }

    let path = Path::new(out_dir).join("spell_catalog.rs");
    let mut file = BufWriter::new(fs::File::create(&path).unwrap());

    let mut builder = phf_codegen::Map::new();
    let quoted: Vec<_> = entries.iter().map(|(id, name)| (*id, format!("\"{}\"", name))).collect();
    for (id, name) in &quoted {
        builder.entry(*id, name);
    }

    writeln!(file, "pub static SPELL_NAMES: phf::Map<u64, &'static str> = {};", builder.build())
        .unwrap();
}
