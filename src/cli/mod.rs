/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Command Line Interface (CLI) module
//!
//! `xrd-rs pattern` computes and prints an overlay of powder patterns,
//! `xrd-rs summary` describes a structure and `xrd-rs radiations` lists the
//! available X-ray sources.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::crystal::StructureSummary;
use crate::input::{self, RunConfig};
use crate::xrd::{
    ExperimentalSeries, Overlay, OverlayEntry, Peak, Radiation, ScatteringTable, XrdCalculator,
};

#[derive(Parser, Debug)]
#[command(name = "xrd-rs", version, about = "Synthetic X-ray powder diffraction patterns")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate diffraction patterns of one or more CIF files
    Pattern(PatternArgs),
    /// Print formula, space group and cell of a CIF file
    Summary(SummaryArgs),
    /// List the named radiation sources and their wavelengths
    Radiations,
}

#[derive(Args, Debug)]
pub struct PatternArgs {
    /// Structure files
    #[arg(required = true, value_name = "CIF")]
    pub cifs: Vec<PathBuf>,

    /// JSON run configuration; command line options override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Named X-ray source, e.g. CuKa or MoKa1
    #[arg(long, conflicts_with = "wavelength")]
    pub radiation: Option<Radiation>,

    /// Wavelength in Å
    #[arg(long)]
    pub wavelength: Option<f64>,

    /// Lower 2θ bound in degrees
    #[arg(long)]
    pub min: Option<f64>,

    /// Upper 2θ bound in degrees
    #[arg(long)]
    pub max: Option<f64>,

    /// Symmetry precision for refinement (0 disables it)
    #[arg(long)]
    pub symprec: Option<f64>,

    /// Debye–Waller factor of an element in Å², repeatable
    #[arg(long = "dw", value_name = "EL=B", value_parser = parse_debye_waller)]
    pub debye_waller: Vec<(String, f64)>,

    /// Intensity scaling in percent of the normalized pattern
    #[arg(long)]
    pub scale: Option<f64>,

    /// Constant background added after scaling
    #[arg(long)]
    pub background: Option<f64>,

    /// Height of the strongest peak after normalization
    #[arg(long)]
    pub normalize: Option<f64>,

    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Measured two-column pattern to overlay
    #[arg(long)]
    pub xy: Option<PathBuf>,

    /// Alternative scattering parameter table (JSON)
    #[arg(long)]
    pub scattering_table: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Unit-cell overrides applied to every structure
#[derive(Args, Debug, Default)]
pub struct LatticeArgs {
    /// Replace a (Å)
    #[arg(long)]
    pub lattice_a: Option<f64>,
    /// Replace b (Å)
    #[arg(long)]
    pub lattice_b: Option<f64>,
    /// Replace c (Å)
    #[arg(long)]
    pub lattice_c: Option<f64>,
    /// Replace α (degrees)
    #[arg(long)]
    pub lattice_alpha: Option<f64>,
    /// Replace β (degrees)
    #[arg(long)]
    pub lattice_beta: Option<f64>,
    /// Replace γ (degrees)
    #[arg(long)]
    pub lattice_gamma: Option<f64>,
    /// Stretch all lengths by this percentage
    #[arg(long, allow_hyphen_values = true)]
    pub lattice_scale: Option<f64>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Structure file
    #[arg(value_name = "CIF")]
    pub cif: PathBuf,

    /// Symmetry precision for space group detection
    #[arg(long, default_value_t = 0.01)]
    pub symprec: f64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn parse_debye_waller(raw: &str) -> Result<(String, f64), String> {
    let (symbol, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected EL=B, got '{}'", raw))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid B factor '{}'", value))?;
    Ok((symbol.trim().to_string(), value))
}

/// Merge the optional configuration file with command line overrides
pub fn resolve_config(args: &PatternArgs) -> anyhow::Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_path(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(radiation) = args.radiation {
        config.radiation = radiation;
        config.wavelength = None;
    }
    if let Some(wavelength) = args.wavelength {
        config.wavelength = Some(wavelength);
    }
    if let Some(min) = args.min {
        config.two_theta_range.0 = min;
    }
    if let Some(max) = args.max {
        config.two_theta_range.1 = max;
    }
    if let Some(symprec) = args.symprec {
        config.symprec = symprec;
    }
    for (symbol, b) in &args.debye_waller {
        config.debye_waller_factors.insert(symbol.clone(), *b);
    }
    if let Some(scale) = args.scale {
        config.scaling_percent = scale;
    }
    if let Some(background) = args.background {
        config.background = background;
    }
    if let Some(normalize) = args.normalize {
        config.normalize_to = normalize;
    }
    if let Some(path) = &args.scattering_table {
        config.scattering_table = Some(path.clone());
    }

    let lattice = &args.lattice;
    let adjustment = &mut config.lattice;
    adjustment.a = lattice.lattice_a.or(adjustment.a);
    adjustment.b = lattice.lattice_b.or(adjustment.b);
    adjustment.c = lattice.lattice_c.or(adjustment.c);
    adjustment.alpha = lattice.lattice_alpha.or(adjustment.alpha);
    adjustment.beta = lattice.lattice_beta.or(adjustment.beta);
    adjustment.gamma = lattice.lattice_gamma.or(adjustment.gamma);
    if let Some(scale) = lattice.lattice_scale {
        adjustment.scale_percent = scale;
    }

    Ok(config)
}

/// Run the parsed command
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Pattern(args) => run_pattern(&args),
        Command::Summary(args) => run_summary(&args),
        Command::Radiations => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for radiation in Radiation::all() {
                writeln!(out, "{:<8} {:.6} Å", radiation, radiation.wavelength())?;
            }
            Ok(())
        }
    }
}

fn run_pattern(args: &PatternArgs) -> anyhow::Result<()> {
    let config = resolve_config(args)?;

    let table = match &config.scattering_table {
        Some(path) => Arc::new(ScatteringTable::from_path(path)?),
        None => ScatteringTable::bundled()?,
    };
    let calculator = XrdCalculator::new(table)
        .with_wavelength(config.wavelength())
        .with_symprec(config.symprec)
        .with_debye_waller_factors(config.debye_waller_factors.clone());
    calculator.validate(config.two_theta_range)?;

    let mut structures = Vec::new();
    for (name, result) in input::read_structures(&args.cifs) {
        match result {
            Ok(structure) => structures.push((name, structure)),
            Err(e) => log::warn!("Skipping {}: {}", name, e),
        }
    }
    if structures.is_empty() {
        bail!("none of the {} structure files could be read", args.cifs.len());
    }

    log::info!(
        "Calculating {} pattern(s) at λ = {:.5} Å over {:?}°",
        structures.len(),
        config.wavelength(),
        config.two_theta_range
    );
    let mut overlay = Overlay::compute(&calculator, &structures, &config.overlay_settings());

    if let Some(path) = &args.xy {
        let series = input::xy::parse(path)
            .with_context(|| format!("failed to read measured data {}", path.display()))?;
        overlay = overlay.with_experimental(series);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => write_table(&overlay, &mut out)?,
        OutputFormat::Csv => write_csv(&overlay, &mut out)?,
        OutputFormat::Json => write_json(&overlay, &mut out)?,
    }
    Ok(())
}

fn run_summary(args: &SummaryArgs) -> anyhow::Result<()> {
    let structure = input::read_structure(&args.cif)
        .with_context(|| format!("failed to read {}", args.cif.display()))?;
    println!("{}", StructureSummary::from_structure(&structure, args.symprec));
    Ok(())
}

fn family_labels(peak: &Peak) -> String {
    peak
        .families
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable peak listing, one block per structure
pub fn write_table<W: Write>(overlay: &Overlay, out: &mut W) -> io::Result<()> {
    for entry in &overlay.entries {
        match entry {
            OverlayEntry::Computed { title, pattern } => {
                writeln!(out, "# {}", title)?;
                writeln!(
                    out,
                    "{:>10} {:>10} {:>10}  {}",
                    "2θ (°)", "d (Å)", "I", "hkl (multiplicity)"
                )?;
                for peak in overlay.visible_peaks(pattern) {
                    let families: Vec<String> = peak
                        .families
                        .iter()
                        .map(|f| format!("{} ({})", f, f.multiplicity))
                        .collect();
                    writeln!(
                        out,
                        "{:>10.4} {:>10.5} {:>10.3}  {}",
                        peak.two_theta,
                        peak.d_spacing,
                        peak.intensity,
                        families.join(", ")
                    )?;
                }
                writeln!(out)?;
            }
            OverlayEntry::Failed { title, error } => {
                writeln!(out, "# {}: failed: {}", title, error)?;
                writeln!(out)?;
            }
        }
    }

    if let Some(series) = &overlay.experimental {
        writeln!(out, "# measured: {} ({} points)", series.name, series.points.len())?;
    }
    if let Some((min, max)) = overlay.x_range() {
        writeln!(out, "# x range: {:.3}° to {:.3}°", min, max)?;
    }
    writeln!(out, "# y limit: {:.3}", overlay.y_limit())
}

/// One row per visible peak: structure, 2θ, intensity, d-spacing, families
pub fn write_csv<W: Write>(overlay: &Overlay, out: &mut W) -> io::Result<()> {
    writeln!(out, "structure,two_theta,intensity,d_spacing,hkl")?;
    for (title, pattern) in overlay.patterns() {
        for peak in overlay.visible_peaks(pattern) {
            writeln!(
                out,
                "{},{:.6},{:.6},{:.6},{}",
                csv_field(title),
                peak.two_theta,
                peak.intensity,
                peak.d_spacing,
                family_labels(peak)
            )?;
        }
    }
    Ok(())
}

fn csv_field(text: &str) -> String {
    if text.contains(|c| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[derive(Serialize)]
struct OverlayReport<'a> {
    entries: &'a [OverlayEntry],
    experimental: Option<&'a ExperimentalSeries>,
    x_range: Option<(f64, f64)>,
    y_limit: f64,
}

/// Overlay with its axis ranges as pretty-printed JSON
pub fn write_json<W: Write>(overlay: &Overlay, out: &mut W) -> anyhow::Result<()> {
    let report = OverlayReport {
        entries: &overlay.entries,
        experimental: overlay.experimental.as_ref(),
        x_range: overlay.x_range(),
        y_limit: overlay.y_limit(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
