// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean operations across every usable engine

use anyhow::Result;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::Vector3;
use polyframe_boolean::{
    adapter, all_engines, apply, available_engines, difference, union, Engine, Mesh, Operation,
    Primitive,
};
use std::f64::consts::PI;
use std::time::Instant;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Engines under test: the usable ones, or all of them with ALL_DEPENDENCIES set
fn engines() -> Vec<Engine> {
    if std::env::var_os("ALL_DEPENDENCIES").is_some() {
        all_engines()
    } else {
        available_engines()
    }
}

fn sphere_at(x: f64, y: f64, z: f64) -> Mesh {
    Primitive::icosphere(1.0, 3)
        .to_mesh()
        .translated(Vector3::new(x, y, z))
}

#[test]
fn test_boolean() -> Result<()> {
    init_logging();
    let a = sphere_at(0.0, 0.0, 0.0);

    // along each axis, then off-axis
    let offsets = [
        Vector3::new(0.75, 0.0, 0.0),
        Vector3::new(0.0, 0.75, 0.0),
        Vector3::new(0.0, 0.0, 0.75),
        Vector3::new(0.6, 0.3, 0.2),
    ];

    for engine in engines() {
        for offset in offsets {
            log::info!("Testing boolean ops with engine {engine}, offset {offset:?}");
            let b = a.clone().translated(offset);
            let name = Some(engine.name());
            let start = Instant::now();

            let ab = a.difference([&b], name)?;
            let ba = b.difference([&a], name)?;
            let i = a.intersection([&b], name)?;
            let u = a.union([&b], name)?;

            log::info!("{engine} took {:?}", start.elapsed());

            assert!(ab.is_volume());
            assert!(ba.is_volume());
            assert!(i.is_volume());
            assert!(u.is_volume());

            // b is a translated copy of a, so both differences hold the same volume
            assert_relative_eq!(ab.volume(), ba.volume(), max_relative = 1e-5);
            assert_relative_eq!(
                u.volume(),
                a.volume() + b.volume() - i.volume(),
                max_relative = 1e-5
            );
            assert_relative_eq!(ab.volume() + i.volume(), a.volume(), max_relative = 1e-5);

            assert!(ab.bounds().min.coords.relative_eq(&a.bounds().min.coords, 1e-6, 1e-6));
            assert!(ba.bounds().max.coords.relative_eq(&b.bounds().max.coords, 1e-6, 1e-6));
            assert_eq!(u.body_count(), 1);
        }
    }
    Ok(())
}

#[test]
fn test_multiple() -> Result<()> {
    init_logging();
    let a = sphere_at(0.0, 0.0, 0.0);
    let b = sphere_at(0.0, 0.0, 0.75);
    let c = sphere_at(0.0, 0.0, 1.5);

    for engine in engines() {
        log::info!("Testing multiple union with engine {engine}");
        let r = union([&a, &b, &c], Some(engine.name()))?;

        assert!(r.is_volume());
        assert_eq!(r.body_count(), 1);
        assert_relative_eq!(r.volume(), 8.617306056726884, max_relative = 1e-5);
    }
    Ok(())
}

#[test]
fn test_empty() -> Result<()> {
    init_logging();
    let a = sphere_at(0.0, 0.0, 0.0);
    let b = sphere_at(5.0, 0.0, 0.0);

    for engine in engines() {
        log::info!("Testing empty intersection with engine {engine}");
        let i = a.intersection([&b], Some(engine.name()))?;

        assert!(i.is_empty());
        assert!(!i.is_volume());
    }
    Ok(())
}

#[test]
fn test_multiple_difference() -> Result<()> {
    init_logging();

    // ring of overlapping spheres around a centered one; the last center
    // repeats the first
    let mut spheres = vec![sphere_at(0.0, 0.0, 0.0)];
    spheres.extend((0..5).map(|i| {
        let theta = 2.0 * PI * i as f64 / 4.0;
        sphere_at(1.5 * theta.cos(), 1.5 * theta.sin(), 0.0)
    }));

    for engine in engines() {
        log::info!("Testing multiple difference with engine {engine}");
        let name = Some(engine.name());

        let diff_base = spheres[0].difference(&spheres[1..], name)?;
        let diff_meth = difference(&spheres, name)?;

        assert_relative_eq!(diff_base.volume(), diff_meth.volume(), max_relative = 1e-9);
        assert!(diff_base.volume() < spheres[0].volume());

        let extents = diff_base.extents();
        assert_abs_diff_eq!(extents, Vector3::new(1.5, 1.5, 2.0), epsilon = 1e-6);
    }
    Ok(())
}

/// Left fold with a pairwise engine, one operand at a time
fn serial_fold(op: Operation, meshes: &[Mesh]) -> Result<Mesh> {
    let bsp = adapter(Engine::Bsp);
    let mut result = meshes[0].clone();
    for mesh in &meshes[1..] {
        result = bsp.compute(op, &[&result, mesh])?;
    }
    Ok(result)
}

#[test]
fn test_serial_and_balanced_agree() -> Result<()> {
    init_logging();

    for op in [Operation::Union, Operation::Intersection] {
        let meshes: Vec<Mesh> = match op {
            // chain of icosahedra along x
            Operation::Union => (0..16)
                .map(|i| {
                    Primitive::icosphere(1.0, 0)
                        .to_mesh()
                        .translated(Vector3::new(i as f64 / 2.0, 0.0, 0.0))
                })
                .collect(),
            // close enough for a non-empty intersection
            _ => (0..=16)
                .map(|i| {
                    let x = 0.5 * i as f64 / 16.0;
                    Primitive::icosphere(1.0, 0)
                        .to_mesh()
                        .translated(Vector3::new(x, x, x))
                })
                .collect(),
        };

        let start = Instant::now();
        let serial = serial_fold(op, &meshes)?;
        log::info!("serial {op} took {:?}", start.elapsed());

        for engine in [Engine::Bsp, Engine::Parallel] {
            let start = Instant::now();
            let balanced = apply(op, &meshes, Some(engine.name()))?;
            log::info!("{engine} {op} took {:?}", start.elapsed());

            assert_eq!(serial.is_volume(), balanced.is_volume());
            assert_eq!(serial.body_count(), balanced.body_count());
            assert_relative_eq!(serial.volume(), balanced.volume(), max_relative = 1e-6);
        }
        assert!(serial.volume() > 0.0);
    }
    Ok(())
}

#[test]
fn test_concurrent_calls() -> Result<()> {
    init_logging();
    let a = sphere_at(0.0, 0.0, 0.0);
    let b = sphere_at(0.0, 0.0, 0.75);
    let expected = union([&a, &b], Some("bsp"))?;

    let results: Vec<(Vec<Engine>, Mesh, Mesh)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| -> Result<_> {
                    let engines = available_engines();
                    let serial = union([&a, &b], Some("bsp"))?;
                    let parallel = union([&a, &b], Some("parallel"))?;
                    Ok((engines, serial, parallel))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect::<Result<_>>()
    })?;

    for (engines, serial, parallel) in &results {
        assert_eq!(engines, &results[0].0);
        assert_eq!(serial, &expected);
        assert!(parallel.is_volume());
        assert_relative_eq!(parallel.volume(), expected.volume(), max_relative = 1e-9);
    }
    assert_eq!(available_engines(), results[0].0);
    Ok(())
}
