/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Crystallographic Information File (CIF) reader
//!
//! Reads the first data block of a CIF: cell parameters, the asymmetric unit
//! from the `_atom_site_*` loop and the symmetry operations, then expands the
//! asymmetric unit into the full cell. Atoms from different rows that land on
//! the same position are combined into one site with mixed occupancy.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::errors::{InputError, Result};
use crate::crystal::{database, Lattice, Site, Structure};

/// Two fractional positions closer than this on every axis coincide
const POSITION_TOLERANCE: f64 = 1e-3;

const SYMOP_TAGS: [&str; 2] = [
    "_symmetry_equiv_pos_as_xyz",
    "_space_group_symop_operation_xyz",
];

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    quoted: bool,
}

impl Token {
    fn is_tag(&self) -> bool {
        !self.quoted && self.text.starts_with('_')
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        !self.quoted && self.text.to_ascii_lowercase().starts_with(keyword)
    }
}

#[derive(Debug, Clone, Default)]
struct Loop {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Loop {
    fn column(&self, tag: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == tag)
    }
}

/// Tags and loops of one data block
#[derive(Debug, Clone, Default)]
struct DataBlock {
    name: String,
    items: HashMap<String, String>,
    loops: Vec<Loop>,
}

impl DataBlock {
    fn find_loop(&self, tag: &str) -> Option<&Loop> {
        self.loops.iter().find(|l| l.column(tag).is_some())
    }
}

/// Parse a CIF file. The structure title is the data block name, or the
/// file stem when the block is unnamed.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Structure> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mut structure = parse_str(&text)?;
    if structure.title().is_empty() {
        if let Some(stem) = path.file_stem() {
            structure.set_title(&stem.to_string_lossy());
        }
    }
    Ok(structure)
}

/// Parse CIF text
pub fn parse_str(text: &str) -> Result<Structure> {
    let block = read_block(&tokenize(text)?)?;

    let lattice = read_lattice(&block)?;
    let operations = read_symmetry_operations(&block)?;
    let asymmetric_unit = read_atoms(&block)?;
    let sites = expand(&asymmetric_unit, &operations)?;

    log::debug!(
        "CIF '{}': {} atoms in asymmetric unit, {} symmetry operations, {} sites",
        block.name,
        asymmetric_unit.len(),
        operations.len(),
        sites.len()
    );

    Ok(Structure::new(lattice, sites).with_title(&block.name))
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((number, line)) = lines.next() {
        // Semicolon-delimited text field
        if let Some(first) = line.strip_prefix(';') {
            let mut field = first.to_string();
            let mut closed = false;
            for (_, next) in lines.by_ref() {
                if next.starts_with(';') {
                    closed = true;
                    break;
                }
                field.push('\n');
                field.push_str(next);
            }
            if !closed {
                return Err(InputError::ParseError(format!(
                    "unterminated text field starting on line {}",
                    number + 1
                )));
            }
            tokens.push(Token {
                text: field.trim().to_string(),
                quoted: true,
            });
            continue;
        }

        tokenize_line(line, &mut tokens);
    }

    Ok(tokens)
}

fn tokenize_line(line: &str, tokens: &mut Vec<Token>) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '#' {
            break;
        }

        if c == '\'' || c == '"' {
            // A quote closes only when followed by whitespace or end of line
            let start = i + 1;
            let mut end = start;
            while end < chars.len()
                && !(chars[end] == c && chars.get(end + 1).map_or(true, |n| n.is_whitespace()))
            {
                end += 1;
            }
            tokens.push(Token {
                text: chars[start..end.min(chars.len())].iter().collect(),
                quoted: true,
            });
            i = end + 1;
            continue;
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        tokens.push(Token {
            text: chars[start..i].iter().collect(),
            quoted: false,
        });
    }
}

/// Collect the first data block
fn read_block(tokens: &[Token]) -> Result<DataBlock> {
    let mut block = DataBlock::default();
    let mut seen_data = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token.is_keyword("data_") {
            if seen_data {
                break;
            }
            seen_data = true;
            block.name = token.text["data_".len()..].to_string();
            i += 1;
        } else if token.is_keyword("loop_") {
            let mut lp = Loop::default();
            i += 1;
            while i < tokens.len() && tokens[i].is_tag() {
                lp.headers.push(tokens[i].text.to_ascii_lowercase());
                i += 1;
            }
            let mut values = Vec::new();
            while i < tokens.len()
                && !tokens[i].is_tag()
                && !tokens[i].is_keyword("loop_")
                && !tokens[i].is_keyword("data_")
            {
                values.push(tokens[i].text.clone());
                i += 1;
            }
            if lp.headers.is_empty() {
                return Err(InputError::ParseError("loop_ without tags".to_string()));
            }
            if values.len() % lp.headers.len() != 0 {
                return Err(InputError::ParseError(format!(
                    "loop starting with {} has {} values for {} columns",
                    lp.headers[0],
                    values.len(),
                    lp.headers.len()
                )));
            }
            lp.rows = values
                .chunks(lp.headers.len())
                .map(|row| row.to_vec())
                .collect();
            block.loops.push(lp);
        } else if token.is_tag() {
            let tag = token.text.to_ascii_lowercase();
            let value = tokens.get(i + 1).ok_or_else(|| {
                InputError::ParseError(format!("tag {} has no value", token.text))
            })?;
            block.items.insert(tag, value.text.clone());
            i += 2;
        } else {
            // Stray value outside any loop
            i += 1;
        }
    }

    if !seen_data {
        return Err(InputError::InvalidFormat("no data_ block".to_string()));
    }
    Ok(block)
}

/// Numeric value with any standard uncertainty "(n)" removed. `?` and `.`
/// mark unknown values.
fn parse_number(raw: &str) -> Result<Option<f64>> {
    let text = raw.split('(').next().unwrap_or("").trim();
    if text.is_empty() || text == "?" || text == "." {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| InputError::ParseError(format!("invalid number '{}'", raw)))
}

fn read_lattice(block: &DataBlock) -> Result<Lattice> {
    let get = |tag: &str, default: Option<f64>| -> Result<f64> {
        let value = match block.items.get(tag) {
            Some(raw) => parse_number(raw)?,
            None => None,
        };
        value
            .or(default)
            .ok_or_else(|| InputError::InvalidFormat(format!("missing {}", tag)))
    };

    Ok(Lattice::from_parameters(
        get("_cell_length_a", None)?,
        get("_cell_length_b", None)?,
        get("_cell_length_c", None)?,
        get("_cell_angle_alpha", Some(90.0))?,
        get("_cell_angle_beta", Some(90.0))?,
        get("_cell_angle_gamma", Some(90.0))?,
    )?)
}

/// Affine operation acting on fractional coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryOperation {
    pub rotation: [[f64; 3]; 3],
    pub translation: [f64; 3],
}

impl SymmetryOperation {
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        }
    }

    /// Parse a Jones-faithful triplet such as `-x+1/2, y-x, z+0.25`
    pub fn from_xyz(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 3 {
            return Err(InputError::ParseError(format!(
                "symmetry operation '{}' needs three components",
                text
            )));
        }

        let mut op = Self {
            rotation: [[0.0; 3]; 3],
            translation: [0.0; 3],
        };
        for (row, part) in parts.iter().enumerate() {
            let (coefficients, shift) = parse_component(part)
                .ok_or_else(|| InputError::ParseError(format!("cannot parse '{}'", text)))?;
            op.rotation[row] = coefficients;
            op.translation[row] = shift;
        }
        Ok(op)
    }

    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = self.translation;
        for (i, value) in out.iter_mut().enumerate() {
            let r = self.rotation[i];
            *value += r[0] * p[0] + r[1] * p[1] + r[2] * p[2];
        }
        out
    }
}

/// One component of an xyz triplet: (coefficients of x, y, z; constant)
fn parse_component(text: &str) -> Option<([f64; 3], f64)> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if compact.is_empty() {
        return None;
    }

    let mut terms: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in compact.chars() {
        if (c == '+' || c == '-') && !current.is_empty() {
            terms.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    terms.push(current);

    let mut coefficients = [0.0; 3];
    let mut constant = 0.0;
    for term in terms {
        let (sign, body) = match term.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, term.strip_prefix('+').unwrap_or(&term)),
        };

        let axis = body.chars().last().and_then(|c| match c {
            'x' => Some(0),
            'y' => Some(1),
            'z' => Some(2),
            _ => None,
        });

        match axis {
            Some(index) => {
                // Optional multiplier, e.g. "2x" or "2*x"
                let factor = body[..body.len() - 1].trim_end_matches('*');
                let factor = if factor.is_empty() {
                    1.0
                } else {
                    parse_fraction(factor)?
                };
                coefficients[index] += sign * factor;
            }
            None => constant += sign * parse_fraction(body)?,
        }
    }

    Some((coefficients, constant))
}

fn parse_fraction(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            Some(num.parse::<f64>().ok()? / den)
        }
        None => text.parse().ok(),
    }
}

fn read_symmetry_operations(block: &DataBlock) -> Result<Vec<SymmetryOperation>> {
    for tag in SYMOP_TAGS {
        if let Some(lp) = block.find_loop(tag) {
            let column = lp.column(tag).unwrap_or(0);
            return lp
                .rows
                .iter()
                .map(|row| SymmetryOperation::from_xyz(&row[column]))
                .collect();
        }
        if let Some(value) = block.items.get(tag) {
            return Ok(vec![SymmetryOperation::from_xyz(value)?]);
        }
    }
    Ok(vec![SymmetryOperation::identity()])
}

/// One row of the `_atom_site_` loop
#[derive(Debug, Clone, PartialEq)]
struct AtomRecord {
    symbol: &'static str,
    frac_coords: [f64; 3],
    occupancy: f64,
}

fn read_atoms(block: &DataBlock) -> Result<Vec<AtomRecord>> {
    let lp = block
        .find_loop("_atom_site_fract_x")
        .ok_or_else(|| InputError::InvalidFormat("no _atom_site_fract_x loop".to_string()))?;

    let column = |tag: &str| lp.column(tag);
    let symbol_column = column("_atom_site_type_symbol")
        .or_else(|| column("_atom_site_label"))
        .ok_or_else(|| {
            InputError::InvalidFormat("atom sites have no symbol or label".to_string())
        })?;
    let coordinate_columns = [
        column("_atom_site_fract_x"),
        column("_atom_site_fract_y"),
        column("_atom_site_fract_z"),
    ];
    let occupancy_column = column("_atom_site_occupancy");

    let mut atoms = Vec::with_capacity(lp.rows.len());
    for row in &lp.rows {
        let raw_symbol = &row[symbol_column];
        let symbol = database::normalize_symbol(raw_symbol)
            .ok_or_else(|| InputError::ParseError(format!("unknown element '{}'", raw_symbol)))?;

        let mut frac_coords = [0.0; 3];
        for (value, col) in frac_coords.iter_mut().zip(coordinate_columns) {
            let col = col.ok_or_else(|| {
                InputError::InvalidFormat("incomplete fractional coordinates".to_string())
            })?;
            *value = parse_number(&row[col])?.ok_or_else(|| {
                InputError::ParseError(format!("missing coordinate for {}", raw_symbol))
            })?;
        }

        let occupancy = match occupancy_column {
            Some(col) => parse_number(&row[col])?.unwrap_or(1.0),
            None => 1.0,
        };

        atoms.push(AtomRecord {
            symbol,
            frac_coords,
            occupancy,
        });
    }

    if atoms.is_empty() {
        return Err(InputError::InvalidFormat("no atom sites".to_string()));
    }
    Ok(atoms)
}

fn wrap(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    if 1.0 - wrapped < 1e-8 {
        0.0
    } else {
        wrapped
    }
}

fn coincide(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| {
        let d = (x - y).abs();
        d.min(1.0 - d) < POSITION_TOLERANCE
    })
}

/// Apply every operation to every atom and merge coincident positions
fn expand(atoms: &[AtomRecord], operations: &[SymmetryOperation]) -> Result<Vec<Site>> {
    // (position, contributing rows, species)
    let mut positions: Vec<([f64; 3], Vec<usize>, Vec<(String, f64)>)> = Vec::new();

    for (row, atom) in atoms.iter().enumerate() {
        for op in operations {
            let p = op.apply(atom.frac_coords).map(wrap);
            match positions.iter_mut().find(|(q, _, _)| coincide(*q, p)) {
                Some((_, rows, _)) if rows.contains(&row) => {}
                Some((_, rows, species)) => {
                    rows.push(row);
                    species.push((atom.symbol.to_string(), atom.occupancy));
                }
                None => positions.push((
                    p,
                    vec![row],
                    vec![(atom.symbol.to_string(), atom.occupancy)],
                )),
            }
        }
    }

    positions
        .into_iter()
        .map(|(p, _, species)| Site::new(p, species).map_err(InputError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ROCK_SALT: &str = r#"
# NaCl, Fm-3m
data_NaCl
_cell_length_a    5.6402(3)
_cell_length_b    5.6402(3)
_cell_length_c    5.6402(3)
_cell_angle_alpha 90
_cell_angle_beta  90
_cell_angle_gamma 90
_symmetry_space_group_name_H-M 'F m -3 m'

loop_
_symmetry_equiv_pos_site_id
_symmetry_equiv_pos_as_xyz
1 'x, y, z'
2 'x, y+1/2, z+1/2'
3 'x+1/2, y, z+1/2'
4 'x+1/2, y+1/2, z'

loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
Na1 Na+ 0.0 0.0 0.0 1.0
Cl1 Cl- 0.5 0.5 0.5 1.0
"#;

    #[test]
    fn test_rock_salt() {
        let structure = parse_str(ROCK_SALT).unwrap();
        assert_eq!(structure.title(), "NaCl");
        assert_eq!(structure.site_count(), 8);
        assert_eq!(structure.reduced_formula(), "NaCl");
        assert_relative_eq!(structure.lattice().parameters().a, 5.6402, epsilon = 1e-10);
        for site in structure.sites() {
            assert!(site.frac_coords().iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn test_symmetry_operation_parsing() {
        let op = SymmetryOperation::from_xyz("-x+1/2, y-x, 0.25+z").unwrap();
        assert_eq!(op.rotation, [[-1.0, 0.0, 0.0], [-1.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(op.translation, [0.5, 0.0, 0.25]);

        let p = op.apply([0.1, 0.3, 0.5]);
        assert_relative_eq!(p[0], 0.4, epsilon = 1e-12);
        assert_relative_eq!(p[1], 0.2, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.75, epsilon = 1e-12);

        assert!(SymmetryOperation::from_xyz("x, y").is_err());
        assert!(SymmetryOperation::from_xyz("x, y, w").is_err());
    }

    #[test]
    fn test_mixed_occupancy_site() {
        let text = r#"
data_FeNi
_cell_length_a 3.56
_cell_length_b 3.56
_cell_length_c 3.56
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
Fe1 0 0 0 0.4
Ni1 0 0 0 0.6
"#;
        let structure = parse_str(text).unwrap();
        assert_eq!(structure.site_count(), 1);
        let site = &structure.sites()[0];
        assert_eq!(site.species().len(), 2);
        assert_eq!(site.dominant_species(), "Ni");
    }

    #[test]
    fn test_missing_cell() {
        let text = "data_x
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Fe 0 0 0
";
        assert!(matches!(parse_str(text), Err(InputError::InvalidFormat(_))));
    }

    #[test]
    fn test_quoted_and_text_fields() {
        let text = r#"
data_quoted
_publ_section_title
;
A multi-line
title
;
_chemical_name_common "it's quoted"
_cell_length_a 4.0
_cell_length_b 4.0
_cell_length_c 4.0
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Cu1 0 0 0
"#;
        let structure = parse_str(text).unwrap();
        assert_eq!(structure.title(), "quoted");
        assert_eq!(structure.site_count(), 1);
    }
}
