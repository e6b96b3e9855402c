//! Gnuplot rendering of a placement.
//!
//! The script draws the boundary and every module as closed polylines and
//! puts the current total HPWL in the title. It is meant for eyeballing
//! a result, not for further processing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;

use crate::error::Result;
use crate::ids::ModuleId;
use crate::netlist::PlacementDb;

const PLOTTER: &str = "gnuplot";

/// Writes the gnuplot script for `db` to `out`.
///
/// Coordinates are printed with six significant digits in `%g` style.
///
/// # Examples
///
/// ```
/// use u_place::netlist::{Boundary, Placement};
/// use u_place::plot::write_gnuplot;
///
/// let placement = Placement::new(Boundary::new(0.0, 10.0, 0.0, 5.0));
/// let mut script = Vec::new();
/// write_gnuplot(&placement, &mut script).unwrap();
/// let script = String::from_utf8(script).unwrap();
/// assert!(script.contains("set title \"wirelength = 0\""));
/// assert!(script.contains("10, 5\n"));
/// ```
pub fn write_gnuplot<D, W>(db: &D, out: &mut W) -> Result<()>
where
    D: PlacementDb + ?Sized,
    W: Write,
{
    let hpwl = db.compute_hpwl()?;
    let boundary = db.boundary();

    writeln!(out, " ")?;
    writeln!(out, "set title \"wirelength = {}\"", fmt_g(hpwl))?;
    writeln!(out, "set size ratio 1")?;
    writeln!(out, "set nokey")?;
    writeln!(out)?;
    writeln!(out, "plot[:][:] '-' w l lt 3 lw 2, '-' w l lt 1")?;
    writeln!(out)?;
    writeln!(out, "# bounding box")?;
    write_box(
        out,
        boundary.left,
        boundary.bottom,
        boundary.right,
        boundary.top,
    )?;
    writeln!(out, "EOF")?;
    writeln!(out, "# modules")?;
    writeln!(out, "0.00, 0.00")?;
    writeln!(out)?;
    for i in 0..db.num_modules() {
        let id = ModuleId::from_raw(i as u32);
        let (x, y) = db.module_position(id)?;
        let (w, h) = db.module_size(id)?;
        write_box(out, x, y, x + w, y + h)?;
    }
    writeln!(out, "EOF")?;
    writeln!(out, "pause -1 'Press any key to close.'")?;
    Ok(())
}

/// Writes the gnuplot script to `path` and, if `prompt` is set, opens it
/// with `gnuplot`.
///
/// Failing to write the file is an error. Failing to launch the viewer
/// or a non-zero viewer exit is only logged, since the placement is
/// already complete by then.
pub fn plot_placement<D, P>(db: &D, path: P, prompt: bool) -> Result<()>
where
    D: PlacementDb + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_gnuplot(db, &mut out)?;
    out.flush()?;
    log::debug!("wrote placement plot to {}", path.display());

    if prompt {
        launch_viewer(PLOTTER, path);
    }
    Ok(())
}

/// Runs `program <script>` and waits for it. Returns whether it exited
/// successfully; [`plot_placement`] ignores the flag since failures are
/// already logged, tests read it.
fn launch_viewer(program: &str, script: &Path) -> bool {
    match Command::new(program).arg(script).status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log::warn!(
                "\"{} {}\" exited with {}",
                program,
                script.display(),
                status
            );
            false
        }
        Err(err) => {
            log::warn!(
                "failed to execute \"{} {}\": {}",
                program,
                script.display(),
                err
            );
            false
        }
    }
}

/// Closed 5-point polyline around `(x1, y1)-(x2, y2)`, then a blank line.
fn write_box<W: Write>(out: &mut W, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
    let (x1, y1, x2, y2) = (fmt_g(x1), fmt_g(y1), fmt_g(x2), fmt_g(y2));
    writeln!(out, "{x1}, {y1}")?;
    writeln!(out, "{x2}, {y1}")?;
    writeln!(out, "{x2}, {y2}")?;
    writeln!(out, "{x1}, {y2}")?;
    writeln!(out, "{x1}, {y1}")?;
    writeln!(out)?;
    Ok(())
}

/// Formats like C's `%g` with the default precision of 6.
fn fmt_g(v: f64) -> String {
    const PRECISION: i32 = 6;

    if v.is_nan() {
        return "nan".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0".into() } else { "0".into() };
    }

    // Round to the target precision first; the exponent after rounding
    // picks the notation.
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp) as usize;
        trim_fraction(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
