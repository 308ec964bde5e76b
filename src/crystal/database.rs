/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Element database
//!
//! Maps element symbols to atomic numbers. The atomic number is the
//! zero-angle limit of the X-ray form factor, so every species that takes part
//! in a diffraction calculation has to resolve here.

const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Provides element symbols for atomic numbers
pub fn element_symbol(atomic_number: u32) -> Option<&'static str> {
    if atomic_number == 0 {
        return None;
    }
    ELEMENT_SYMBOLS.get(atomic_number as usize - 1).copied()
}

/// Returns the atomic number for an exact element symbol ("Fe", not "fe")
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ELEMENT_SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .map(|idx| idx as u32 + 1)
}

/// Resolves a loosely written species label to a canonical element symbol.
///
/// Accepts oxidation-state decorated symbols ("Fe3+", "O2-"), site labels
/// ("Fe1", "O2a") and wrong capitalisation ("FE"). A two-letter prefix is
/// preferred over a one-letter one, so "Co1" is cobalt rather than carbon.
pub fn normalize_symbol(raw: &str) -> Option<&'static str> {
    let letters: Vec<char> = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .take(2)
        .collect();

    if letters.is_empty() {
        return None;
    }

    let first = letters[0].to_ascii_uppercase();
    if letters.len() == 2 {
        let candidate: String = [first, letters[1].to_ascii_lowercase()].iter().collect();
        if let Some(z) = atomic_number(&candidate) {
            return element_symbol(z);
        }
    }

    atomic_number(&first.to_string()).and_then(element_symbol)
}
