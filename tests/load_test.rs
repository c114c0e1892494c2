#![warn(clippy::pedantic)]

mod common;

use std::f64::consts::SQRT_2;

use approx::assert_relative_eq;
use ndarray::Array2;
use trussbridge::loads::{build_load_cases, member_geometry, MemberGeometry};
use trussbridge::solver::solve;
use trussbridge::stiffness::{apply_restraints, assemble, TrussElement};
use trussbridge::{
    analyze_bridge, point, Analysis, AnalysisStatus, MemberFailure, Restraints,
};

use common::{warren, HEAVY_SITE, STANDARD_SITE, STRONG, WEAK};

/// 0.01 m² of steel.
const AREA: f64 = 0.01;
/// Elastic modulus of steel, kPa.
const STEEL: f64 = 2.0e8;

#[test]
fn axially_loaded_bar_shortens_by_pl_over_ae() {
    let geometry = MemberGeometry::between(point(0.0, 0.0), point(1.0, 0.0));
    let elements = [TrussElement::new(0, 1, AREA, STEEL, &geometry)];
    let mut stiffness = assemble(2, &elements);
    let mut loads = Array2::zeros((1, 4));
    loads[(0, 2)] = -1_000.0;
    let mut restraints = Restraints::unrestrained(2);
    restraints.set(0, true, true);
    restraints.set(1, false, true);
    apply_restraints(&mut stiffness, &mut loads, &restraints);

    let displacements = solve(stiffness, &loads).expect("supported bar");
    assert_relative_eq!(displacements[(0, 2)], -1_000.0 / (AREA * STEEL), max_relative = 1e-12);
    assert_relative_eq!(displacements[(0, 3)], 0.0);
    assert_relative_eq!(
        elements[0].axial_force(displacements.row(0)),
        -1_000.0,
        max_relative = 1e-12
    );
}

#[test]
fn load_at_a_supported_joint_leaves_the_member_unloaded() {
    let geometry = MemberGeometry::between(point(0.0, 0.0), point(1.0, 0.0));
    let elements = [TrussElement::new(0, 1, AREA, STEEL, &geometry)];
    let mut stiffness = assemble(2, &elements);
    let mut loads = Array2::zeros((1, 4));
    loads[(0, 3)] = -50.0;
    let mut restraints = Restraints::unrestrained(2);
    restraints.set(0, true, true);
    restraints.set(1, false, true);
    apply_restraints(&mut stiffness, &mut loads, &restraints);

    let displacements = solve(stiffness, &loads).expect("supported bar");
    assert_relative_eq!(elements[0].axial_force(displacements.row(0)), 0.0);
}

#[test]
fn symmetric_two_bar_truss_shares_the_load() {
    let (a, b, c) = (point(0.0, 0.0), point(2.0, 0.0), point(1.0, 1.0));
    let elements = [
        TrussElement::new(0, 2, AREA, STEEL, &MemberGeometry::between(a, c)),
        TrussElement::new(1, 2, AREA, STEEL, &MemberGeometry::between(b, c)),
    ];
    let mut stiffness = assemble(3, &elements);
    let mut loads = Array2::zeros((1, 6));
    loads[(0, 5)] = -10.0;
    let mut restraints = Restraints::unrestrained(3);
    restraints.set(0, true, true);
    restraints.set(1, true, true);
    apply_restraints(&mut stiffness, &mut loads, &restraints);

    let displacements = solve(stiffness, &loads).expect("triangle is stable");
    for element in &elements {
        assert_relative_eq!(
            element.axial_force(displacements.row(0)),
            -10.0 / SQRT_2,
            max_relative = 1e-9
        );
    }
    assert_relative_eq!(displacements[(0, 4)], 0.0, epsilon = 1e-15);
}

#[test]
fn two_bars_in_a_line_are_a_mechanism() {
    let geometry = MemberGeometry::between(point(0.0, 0.0), point(1.0, 0.0));
    let elements = [
        TrussElement::new(0, 1, AREA, STEEL, &geometry),
        TrussElement::new(1, 2, AREA, STEEL, &geometry),
    ];
    let mut stiffness = assemble(3, &elements);
    let mut loads = Array2::zeros((1, 6));
    let mut restraints = Restraints::unrestrained(3);
    restraints.set(0, true, true);
    restraints.set(2, true, true);
    apply_restraints(&mut stiffness, &mut loads, &restraints);

    let instability = solve(stiffness, &loads).expect_err("middle joint can drop");
    assert_eq!(instability.equation, 3);
}

#[test]
fn warren_truss_is_just_determinate() {
    let bridge = warren(STANDARD_SITE, STRONG);
    let restraints = Restraints::derive(bridge.conditions(), bridge.joint_count());
    assert_eq!(bridge.joint_count(), 11);
    assert_eq!(
        bridge.member_count(),
        2 * bridge.joint_count() - restraints.count()
    );

    let mut analysis = Analysis::new();
    assert_eq!(analysis.initialize(&bridge), AnalysisStatus::Passes);
    let results = analysis.results().expect("stable");
    assert_eq!(results.load_case_count(), 6);
    assert_eq!(results.member_count(), 19);
}

#[test]
fn removing_any_member_makes_the_truss_unstable() {
    for index in 0..19 {
        let mut bridge = warren(STANDARD_SITE, STRONG);
        bridge.remove_member(index).expect("member exists");
        let mut analysis = Analysis::new();
        assert_eq!(
            analysis.initialize(&bridge),
            AnalysisStatus::Unstable,
            "without member {index}"
        );
        assert!(analysis.results().is_none());
    }
}

#[test]
fn weak_members_fail_the_load_test() {
    let mut bridge = warren(STANDARD_SITE, WEAK);
    assert!(bridge.is_passing_slenderness_check());
    let analysis = analyze_bridge(&mut bridge);
    assert_eq!(analysis.status(), AnalysisStatus::FailsLoadTest);

    let results = analysis.results().expect("stable");
    let overloaded = (0..results.member_count())
        .filter(|&m| results.compression_ratio(m) > 1.0 || results.tension_ratio(m) > 1.0)
        .count();
    assert!(overloaded > 0);
    // Dead load alone overloads the middle deck chord.
    assert!(results.member_fails(0, 6));
}

#[test]
fn slender_members_downgrade_a_passing_bridge() {
    let mut bridge = warren(STANDARD_SITE, STRONG);
    // A 30 mm bar on a 4 m chord is far past the limit.
    let top_chord = bridge.member_count() - 1;
    bridge
        .set_member_stock(top_chord, 0, 0, 0)
        .expect("valid stock");
    assert!(!bridge.is_passing_slenderness_check());

    let analysis = analyze_bridge(&mut bridge);
    assert_eq!(analysis.status(), AnalysisStatus::FailsSlenderness);
    assert!(!analysis.status().allows_report());
    assert!(analysis.results().is_some());
}

#[test]
fn every_free_joint_is_in_equilibrium() {
    let bridge = warren(STANDARD_SITE, STRONG);
    let geometry = member_geometry(&bridge);
    let loads = build_load_cases(&bridge, &geometry);
    let restraints = Restraints::derive(bridge.conditions(), bridge.joint_count());
    let mut analysis = Analysis::new();
    analysis.initialize(&bridge);
    let results = analysis.results().expect("stable");

    for case in 0..results.load_case_count() {
        let mut residual = loads.row(case).to_owned();
        for (m, g) in geometry.iter().enumerate() {
            let force = results.member_force(case, m);
            let (a, b) = results.member_joints(m);
            residual[2 * a] += force * g.cos_x;
            residual[2 * a + 1] += force * g.cos_y;
            residual[2 * b] -= force * g.cos_x;
            residual[2 * b + 1] -= force * g.cos_y;
        }
        for joint in 0..bridge.joint_count() {
            if !restraints.is_x_restrained(joint) {
                assert_relative_eq!(residual[2 * joint], 0.0, epsilon = 1e-4);
            }
            if !restraints.is_y_restrained(joint) {
                assert_relative_eq!(residual[2 * joint + 1], 0.0, epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn symmetric_bridge_under_equal_axles_has_mirrored_forces() {
    let bridge = warren(HEAVY_SITE, STRONG);
    let span = bridge.conditions().x_rightmost_deck_joint();
    let mut analysis = Analysis::new();
    analysis.initialize(&bridge);
    let results = analysis.results().expect("stable");

    let mirror_of = |m: usize| -> usize {
        let member = bridge.member(m).expect("member");
        let (a, b) = (member.start, member.end);
        let mirrored = |p: trussbridge::Point| point(span - p.x, p.y);
        let (ma, mb) = (mirrored(a), mirrored(b));
        bridge
            .members()
            .find(|other| {
                let same = |p: trussbridge::Point, q: trussbridge::Point| p.distance(q) < 1e-9;
                (same(other.start, ma) && same(other.end, mb))
                    || (same(other.start, mb) && same(other.end, ma))
            })
            .map(|other| other.index)
            .expect("every member has a mirror image")
    };

    let n = results.load_case_count();
    for m in 0..results.member_count() {
        let mirror = mirror_of(m);
        assert_relative_eq!(
            results.member_force(0, m),
            results.member_force(0, mirror),
            epsilon = 1e-6,
            max_relative = 1e-9
        );
        for case in 1..n {
            assert_relative_eq!(
                results.member_force(case, m),
                results.member_force(n - case, mirror),
                epsilon = 1e-6,
                max_relative = 1e-9
            );
        }
    }
}

#[test]
fn repeated_analysis_gives_identical_results() {
    let bridge = warren(STANDARD_SITE, STRONG);
    let mut analysis = Analysis::new();
    let first_status = analysis.initialize(&bridge);
    let first = analysis.results().cloned().expect("stable");
    let second_status = analysis.initialize(&bridge);
    assert_eq!(first_status, second_status);
    assert_eq!(analysis.results(), Some(&first));
}

#[test]
fn reused_analysis_forgets_the_previous_bridge() {
    let stable = warren(STANDARD_SITE, STRONG);
    let mut unstable = warren(STANDARD_SITE, STRONG);
    unstable.remove_member(0).expect("member exists");

    let mut analysis = Analysis::new();
    analysis.initialize(&stable);
    assert!(analysis.results().is_some());
    assert_eq!(analysis.initialize(&unstable), AnalysisStatus::Unstable);
    assert!(analysis.results().is_none());
}

#[test]
fn real_analysis_records_ratios_and_perturbed_analysis_does_not() {
    let mut bridge = warren(STANDARD_SITE, STRONG);
    let analysis = analyze_bridge(&mut bridge);
    let results = analysis.results().expect("stable");
    let recorded: Vec<_> = bridge
        .members()
        .map(|m| {
            (
                m.member.compression_force_strength_ratio(),
                m.member.tension_force_strength_ratio(),
            )
        })
        .collect();
    assert_eq!(recorded[0], (Some(results.compression_ratio(0)), Some(results.tension_ratio(0))));

    let mut failures = vec![MemberFailure::NotFailed; bridge.member_count()];
    failures[0] = MemberFailure::Failed;
    let mut perturbed = Analysis::new();
    assert!(perturbed.initialize_perturbed(&bridge, &failures) > AnalysisStatus::Unstable);
    let softened = perturbed.results().expect("still stable");
    assert!(softened.x_joint_displacement(3, 1).abs() > results.x_joint_displacement(3, 1).abs());

    let after: Vec<_> = bridge
        .members()
        .map(|m| {
            (
                m.member.compression_force_strength_ratio(),
                m.member.tension_force_strength_ratio(),
            )
        })
        .collect();
    assert_eq!(recorded, after);
}

#[test]
fn unstable_analysis_leaves_recorded_ratios_alone() {
    let mut bridge = warren(STANDARD_SITE, STRONG);
    analyze_bridge(&mut bridge);
    let before = bridge.member(3).expect("member").member.tension_force_strength_ratio();
    assert!(before.is_some());

    bridge.remove_member(0).expect("member exists");
    let analysis = analyze_bridge(&mut bridge);
    assert_eq!(analysis.status(), AnalysisStatus::Unstable);
    assert_eq!(
        bridge.member(3).expect("member").member.tension_force_strength_ratio(),
        before
    );
}
