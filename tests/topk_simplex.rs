use totsu_prox::prelude::*;
use totsu_prox::prox::{ProjError, Thresholds};
use totsu_prox::*;

use float_eq::assert_float_eq;

mod common;

//

#[test]
fn test_topk_simplex1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = common::rng(10);

    for &n in &[1, 4, 10, 25] {
        for &k in &[0., 0.5, 1., 2., 2.5, 3.] {
            for &rho in &[0.2, 1., 4.] {
                for &rhs in &[0.3, 1., 10.] {
                    let a = common::rand_point(&mut rng, n, 2.);
                    let p = ProxTopKSimplexBiased::new().par(|p| {
                        p.k = k;
                        p.rho = rho;
                        p.rhs = rhs;
                    });

                    let x = &mut a.clone();
                    let aux = &mut vec![0.; n];
                    p.proj_aux(x, aux).unwrap();

                    common::assert_in_topk(x, k, rhs, 1e-9);
                    let gap = common::gap_topk(&a, x, k, rhs, rho);
                    assert!(gap.abs() <= 1e-8, "gap {} for k {} rho {} rhs {} {:?}", gap, k, rho, rhs, a);
                }
            }
        }
    }
}

#[test]
fn test_topk_simplex2()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // one dominant element: the budget binds and spreads the mass beyond it
    let a = [100., 0.1, 0., -1.];
    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.k = 2.;
        p.rho = 0.001;
        p.rhs = 10.;
    });

    let x = &mut a.clone();
    let aux = &mut[0.; 4];
    p.proj_aux(x, aux).unwrap();

    let t = -59. / 30.;
    assert_float_eq!(&[5., 0.1 - t, -t, -1. - t], x, abs_all <= 1e-12);
    common::assert_in_topk(x, 2., 10., 1e-12);

    // constant case capped by the budget
    let a = [100., 0., -100.];
    let x = &mut a.clone();
    p.proj_aux(x, aux).unwrap();
    assert_float_eq!(&[5., 5., 0.], x, abs_all <= 1e-12);
}

#[test]
fn test_topk_simplex3()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // k = 0 is the biased knapsack on the box [0, rhs]
    let mut rng = common::rng(11);

    for _ in 0.. 20 {
        let a = common::rand_point(&mut rng, 12, 2.);
        let p = ProxTopKSimplexBiased::new().par(|p| {
            p.k = 0.;
            p.rho = 0.5;
            p.rhs = 1.5;
        });
        let q = ProxKnapsackLeBiased::new().par(|p| {
            p.lo = 0.;
            p.hi = 1.5;
            p.rhs = 1.5;
            p.rho = 0.5;
        });

        let x = &mut a.clone();
        let y = &mut a.clone();
        let aux = &mut vec![0.; 12];
        p.proj_aux(x, aux).unwrap();
        q.proj_aux(y, aux).unwrap();
        assert_float_eq!(&x[..], &y[..], abs_all <= 0.);
    }
}

#[test]
fn test_topk_simplex4()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.k = 2.;
    });

    // no positive mass among the top k
    let x = &mut[0.5, -1., -2.];
    let th = p.proj(x).unwrap();
    assert_eq!(x, &[0., 0., 0.]);
    assert_eq!(th, Thresholds::zero());

    // k exceeds the length
    let x = &mut[3.];
    p.proj(x).unwrap();
    assert_eq!(x, &[0.]);

    let x = &mut[0.5, f64::NAN];
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);

    let x = &mut[0.5, 0.5];
    let p = p.par(|p| {
        p.rho = f64::INFINITY;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);
}

#[test]
fn test_topk_simplex5()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // a loose budget leaves the cone solution
    let mut rng = common::rng(12);

    for &k in &[1., 1.5, 3.] {
        for _ in 0.. 20 {
            let a = common::rand_point(&mut rng, 8, 2.);
            let p = ProxTopKSimplexBiased::new().par(|p| {
                p.k = k;
                p.rho = 0.7;
                p.rhs = 1e3;
            });
            let q = ProxTopKConeBiased::new().par(|p| {
                p.k = k;
                p.rho = 0.7;
            });

            let x = &mut a.clone();
            let y = &mut a.clone();
            let aux = &mut vec![0.; 8];
            p.proj_aux(x, aux).unwrap();
            q.proj_aux(y, aux).unwrap();
            assert_float_eq!(&x[..], &y[..], abs_all <= 1e-9);

            let rhs = 2. * common::sum(y) + 1.;
            let gap = common::gap_topk(&a, y, k, rhs, 0.7);
            assert!(gap.abs() <= 1e-8, "gap {} for k {} {:?}", gap, k, a);
        }
    }
}

#[test]
fn test_topk_simplex6()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // batches of scores, one block per sample
    let mut rng = common::rng(13);
    let dim = 4;
    let blk = 6;
    let a = common::rand_point(&mut rng, dim * blk, 2.);

    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.k = 2.;
        p.rho = 0.5;
        p.rhs = 1.;
    });

    let x = &mut a.clone();
    let aux = &mut vec![0.; blk];
    p.proj_batch(dim, x, aux).unwrap();

    for (xb, ab) in x.chunks(blk).zip(a.chunks(blk)) {
        common::assert_in_topk(xb, 2., 1., 1e-9);
        let gap = common::gap_topk(ab, xb, 2., 1., 0.5);
        assert!(gap.abs() <= 1e-8);
    }
}

#[test]
fn test_topk_simplex7()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // long point in the general case of the cone
    let mut rng = common::rng(14);
    let n = 100_000;
    let a = common::rand_point(&mut rng, n, 2.);

    let q = ProxTopKConeBiased::new().par(|p| {
        p.k = 1000.5;
        p.rho = 0.5;
    });
    assert_eq!(q.classify(&mut a.clone()), ConeCase::General);

    let y = &mut a.clone();
    let aux = &mut vec![0.; n];
    q.proj_aux(y, aux).unwrap();

    let rhs = 2. * common::sum(y) + 1.;
    common::assert_in_topk(y, 1000.5, rhs, 1e-9);
    let gap = common::gap_topk(&a, y, 1000.5, rhs, 0.5);
    assert!(gap.abs() <= 1e-6, "gap {}", gap);
}
