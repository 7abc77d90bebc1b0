//! End-to-end tests, from equation text to sampled buffers
use approx::assert_relative_eq;
use hypersurf::{
    Error, Session,
    eval::{Evaluator, ScalarFunction},
    rhai::{self, ScriptCompiler},
    sample::{BoundingBox, SampleConfig, Sampler, sample},
    session::SessionConfig,
};
use std::num::NonZeroUsize;

#[test]
fn sphere_grid() {
    let mut e = Evaluator::new(ScriptCompiler::new());
    e.load("x^2+y^2+z^2-4").unwrap();
    let f = e.current().unwrap();

    let bounds = BoundingBox::cube(4.0).unwrap();
    let out = sample(f.as_ref(), &bounds, 5, 0.0).unwrap();
    let buf = &out.buffer;
    assert_eq!(buf.len(), 125);
    assert_eq!(buf.get(0, 0, 0), Some([-4.0, -4.0, -4.0, 44.0]));
    assert_eq!(buf.get(2, 2, 2), Some([0.0, 0.0, 0.0, -4.0]));
    assert_eq!(buf.value_range(), Some((-4.0, 44.0)));
    assert_eq!(buf.intensity(), buf.zs());

    // Every sample agrees with a direct evaluation
    for [x, y, z, v] in buf.iter() {
        assert_eq!(v, x * x + y * y + z * z - 4.0);
    }
}

#[test]
fn sqrt_over_negative_x() {
    let f = rhai::compile("sqrt(x) - z").unwrap();
    let bounds = BoundingBox::cube(1.0).unwrap();
    match sample(&f, &bounds, 4, 0.0) {
        Err(Error::Evaluation(e)) => {
            let [x, ..] = e.point().unwrap();
            assert!(x < 0.0);
            assert!(e.to_string().contains("sqrt"), "{e}");
        }
        r => panic!("unexpected result {r:?}"),
    }
}

#[test]
fn threaded_matches_serial() {
    let f = rhai::compile("sin(sqrt(x^2 + y^2) - t) - z").unwrap();
    let bounds = BoundingBox::new([-5.0, 5.0], [-5.0, 5.0], [-2.0, 2.0]).unwrap();
    let serial = sample(&f, &bounds, 20, 2.5).unwrap();

    let sampler = Sampler::new(SampleConfig {
        threads: NonZeroUsize::new(3).unwrap().into(),
    })
    .unwrap();
    let threaded = sampler.sample(&f, &bounds, 20, 2.5).unwrap();
    assert_eq!(serial.buffer, threaded.buffer);

    let [x, y, z, v] = serial.buffer.get(3, 11, 19).unwrap();
    assert_relative_eq!(
        v,
        ((x * x + y * y).sqrt() - 2.5).sin() - z,
        epsilon = 1e-12
    );
}

#[test]
fn time_changes_the_field() {
    let f = rhai::compile("x^2 + y^2 + z^2 - (2 + sin(t))^2").unwrap();
    let a = f.eval(0.0, 0.0, 0.0, 0.0).unwrap();
    let b = f.eval(0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2).unwrap();
    assert_relative_eq!(a, -4.0);
    assert_relative_eq!(b, -9.0);
}

#[test]
fn session_keeps_last_good_equation() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    s.set_equation("z - sin(x)").unwrap();
    assert!(matches!(
        s.set_equation("sin(x +"),
        Err(Error::Compile { .. })
    ));
    assert!(matches!(s.set_equation("w + x"), Err(Error::Compile { .. })));
    assert_eq!(s.equation(), Some("z - sin(x)"));
    assert!(s.sample().is_ok());
}
