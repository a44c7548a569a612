//! dual_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the three search strategies used by
//! the dual optimizer. These helpers hide Argmin's generic wiring and apply
//! crate-level options (tolerances, simplex size, GIS constant) so that
//! higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct a Nelder–Mead simplex from the vertices around `λ₀` with
//!   edge length `opts.simplex_step`, stopping on the standard deviation of
//!   the simplex costs (`tol_cost`).
//! - Construct BFGS solvers with either Hager–Zhang or More–Thuente line
//!   search, applying `tol_grad` and `tol_cost` via a shared helper. The
//!   Hager–Zhang bracket is capped at `MAX_LINE_SEARCH_STEP`.
//! - Construct the iterative-scaling solver with its overlap constant.
//!
//! Conventions
//! -----------
//! - Builders do **not** set `max_iters` or the timeout; these are applied
//!   by the runner. Only the simplex builder needs the starting point,
//!   because Argmin stores the initial vertices inside the solver.
//! - Errors are always reported via [`OptResult`]; the underlying
//!   `argmin::core::Error` values never leak across module boundaries.
//!
//! Testing notes
//! -------------
//! - Unit tests verify simplex geometry and tolerance wiring. Full solves
//!   are exercised in `api`.
use argmin::solver::quasinewton::BFGS;

use crate::optimization::{
    dual_optimizer::{
        scaling::IterativeScaling,
        traits::DualOptions,
        types::{
            BfgsHagerZhang, BfgsMoreThuente, Cost, HagerZhangLS, MoreThuenteLS, Simplex, Theta,
            MAX_LINE_SEARCH_STEP,
        },
    },
    errors::OptResult,
};

/// build_simplex — construct Nelder–Mead from precomputed vertices.
///
/// Parameters
/// ----------
/// - `vertices`: `Vec<Theta>`
///   Initial simplex, usually from [`simplex_vertices`].
/// - `opts`: `&DualOptions`
///   Consults `tols.tol_cost` for the sd tolerance.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) if Argmin rejects the
///   tolerance.
pub fn build_simplex(vertices: Vec<Theta>, opts: &DualOptions) -> OptResult<Simplex> {
    let solver = Simplex::new(vertices);
    match opts.tols.tol_cost {
        Some(tol) => Ok(solver.with_sd_tolerance(tol)?),
        None => Ok(solver),
    }
}

/// build_bfgs_hager_zhang — construct BFGS with Hager–Zhang line search.
///
/// Errors
/// ------
/// - `OptError` if `with_tolerance_grad` / `with_tolerance_cost` rejects a
///   tolerance.
/// - `OptError` if the step bracket `[ε, MAX_LINE_SEARCH_STEP]` is rejected.
pub fn build_bfgs_hager_zhang(opts: &DualOptions) -> OptResult<BfgsHagerZhang> {
    let line_search = HagerZhangLS::new().with_bounds(f64::EPSILON, MAX_LINE_SEARCH_STEP)?;
    configure_bfgs(BFGS::new(line_search), opts)
}

/// build_bfgs_more_thuente — construct BFGS with More–Thuente line search.
///
/// Errors
/// ------
/// - `OptError` if `with_tolerance_grad` / `with_tolerance_cost` rejects a
///   tolerance.
pub fn build_bfgs_more_thuente(opts: &DualOptions) -> OptResult<BfgsMoreThuente> {
    configure_bfgs(BFGS::new(MoreThuenteLS::new()), opts)
}

/// build_iterative_scaling — construct the GIS solver.
///
/// `overlap` is the largest number of features active on one outcome;
/// `tols.tol_cost` bounds the largest accepted step at convergence.
pub fn build_iterative_scaling(overlap: usize, opts: &DualOptions) -> IterativeScaling {
    IterativeScaling::new(overlap, opts.tols.tol_cost)
}

/// configure_bfgs — apply optional tolerances to a BFGS solver.
///
/// Shared by both line-search variants.
pub fn configure_bfgs<L>(mut bfgs: BFGS<L, Cost>, opts: &DualOptions) -> OptResult<BFGS<L, Cost>> {
    if let Some(tol) = opts.tols.tol_grad {
        bfgs = bfgs.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        bfgs = bfgs.with_tolerance_cost(tol)?;
    }
    Ok(bfgs)
}

/// simplex_vertices — `λ₀` followed by `λ₀ + step · e_i` for each axis.
pub fn simplex_vertices(theta0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}
