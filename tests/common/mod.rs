#![allow(dead_code)]

use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

//

pub fn rng(seed: u64) -> Xoshiro256StarStar
{
    Xoshiro256StarStar::seed_from_u64(seed)
}

/// uniform random point in [-scale, scale)^n
pub fn rand_point(rng: &mut Xoshiro256StarStar, n: usize, scale: f64) -> Vec<f64>
{
    (0.. n).map(|_| scale * (2. * rng.gen::<f64>() - 1.)).collect()
}

pub fn sum(x: &[f64]) -> f64
{
    x.iter().sum()
}

pub fn dist_sq(x: &[f64], a: &[f64]) -> f64
{
    x.iter().zip(a).map(|(xi, ai)| (xi - ai) * (xi - ai)).sum()
}

/// gradient of 1/2 |x - a|^2 + rho/2 (sum x)^2
pub fn grad(a: &[f64], x: &[f64], rho: f64) -> Vec<f64>
{
    let s = sum(x);
    x.iter().zip(a).map(|(xi, ai)| xi - ai + rho * s).collect()
}

fn dot(x: &[f64], y: &[f64]) -> f64
{
    x.iter().zip(y).map(|(xi, yi)| xi * yi).sum()
}

fn sorted_asc(g: &[f64]) -> Vec<f64>
{
    let mut g = g.to_vec();
    g.sort_by(|a, b| a.partial_cmp(b).unwrap());
    g
}

/// min <g, v> over lo <= v_i <= hi, sum v <= rhs
fn lmo_knapsack(g: &[f64], lo: f64, hi: f64, rhs: f64) -> f64
{
    let n = g.len() as f64;
    let mut budget = rhs - n * lo;
    assert!(budget >= 0.);

    let mut val = lo * sum(g);
    for gi in sorted_asc(g) {
        if gi >= 0. || budget <= 0. {
            break;
        }
        let d = (hi - lo).min(budget);
        val += gi * d;
        budget -= d;
    }
    val
}

/// min <g, v> over 0 <= v_i <= (sum v) / k, sum v <= rhs
fn lmo_topk(g: &[f64], k: f64, rhs: f64) -> f64
{
    if k > g.len() as f64 {
        return 0.;
    }

    let g = sorted_asc(g);
    let kf = k.floor() as usize;
    let frac = k - k.floor();

    let mut c: f64 = g[.. kf].iter().sum();
    if frac > 0. {
        c += frac * g[kf];
    }
    (rhs / k * c).min(0.)
}

/// Frank-Wolfe gap of the biased knapsack, zero at the optimum
pub fn gap_knapsack(a: &[f64], x: &[f64], lo: f64, hi: f64, rhs: f64, rho: f64) -> f64
{
    let g = grad(a, x, rho);
    dot(&g, x) - lmo_knapsack(&g, lo, hi, rhs)
}

/// Frank-Wolfe gap of the biased top-k simplex, zero at the optimum
pub fn gap_topk(a: &[f64], x: &[f64], k: f64, rhs: f64, rho: f64) -> f64
{
    let g = grad(a, x, rho);
    if k == 0. {
        dot(&g, x) - lmo_knapsack(&g, 0., rhs, rhs)
    }
    else {
        dot(&g, x) - lmo_topk(&g, k, rhs)
    }
}

pub fn assert_in_topk(x: &[f64], k: f64, rhs: f64, tol: f64)
{
    let s = sum(x);
    assert!(s <= rhs + tol, "sum {} > {}", s, rhs);
    for &xi in x {
        assert!(xi >= -tol, "{} < 0", xi);
        if k > 0. {
            assert!(xi <= s / k + tol, "{} > {} / {}", xi, s, k);
        }
    }
}

pub fn assert_in_knapsack(x: &[f64], lo: f64, hi: f64, rhs: f64, tol: f64)
{
    let s = sum(x);
    assert!(s <= rhs + tol, "sum {} > {}", s, rhs);
    for &xi in x {
        assert!(lo - tol <= xi && xi <= hi + tol, "{} out of [{}, {}]", xi, lo, hi);
    }
}
