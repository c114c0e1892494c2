use std::fmt::{self, Write};

use trussbridge::{AnalysisResults, Bridge};

/// Column headings of the load test table.
const HEADINGS: [&str; 11] = [
    "#", "Matl", "Section", "Length", "Slender", "Comp", "Strength", "Status", "Tens",
    "Strength", "Status",
];

/// Pass/fail word for one force/strength pair.
fn verdict(force: f64, strength: f64) -> &'static str {
    if force > strength {
        "Fail"
    } else {
        "OK"
    }
}

/// Write the per-member load test table.
///
/// Forces are worst cases over all load cases in kN, lengths in metres.
pub fn write_load_test(
    out: &mut impl Write,
    bridge: &Bridge,
    results: &AnalysisResults,
) -> fmt::Result {
    writeln!(
        out,
        "{:>4} {:>5} {:>12} {:>7} {:>8} {:>9} {:>9} {:>6} {:>9} {:>9} {:>6}",
        HEADINGS[0], HEADINGS[1], HEADINGS[2], HEADINGS[3], HEADINGS[4], HEADINGS[5],
        HEADINGS[6], HEADINGS[7], HEADINGS[8], HEADINGS[9], HEADINGS[10],
    )?;
    for member in bridge.members() {
        let i = member.index;
        let length = bridge.member_length(i).unwrap_or_default();
        let slenderness = bridge.member_slenderness(i).unwrap_or_default();
        let compression = results.member_compressive_force(i);
        let compressive_strength = results.member_compressive_strength(i);
        let tension = results.member_tensile_force(i);
        let tensile_strength = results.member_tensile_strength(i);
        writeln!(
            out,
            "{:>4} {:>5} {:>12} {:>7.2} {:>8.1} {:>9.1} {:>9.1} {:>6} {:>9.1} {:>9.1} {:>6}",
            i + 1,
            member.member.material().short_name,
            member.member.shape().name,
            length,
            slenderness,
            compression,
            compressive_strength,
            verdict(compression, compressive_strength),
            tension,
            tensile_strength,
            verdict(tension, tensile_strength),
        )?;
    }
    Ok(())
}
