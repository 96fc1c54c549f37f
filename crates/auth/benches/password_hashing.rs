use criterion::{Criterion, black_box, criterion_group, criterion_main};

use serde_json::json;
use warden_auth::{
    JwtCustomizer, JwtCustomizerKind, UsersPasswordAlgorithm, ValidationMode, encrypt_password,
    validate,
};

fn bench_encrypt_password(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_password");
    group.sample_size(10);

    group.bench_function("argon2i_default_costs", |b| {
        b.iter(|| {
            encrypt_password(black_box("correct horse"), UsersPasswordAlgorithm::Argon2i).unwrap()
        });
    });

    // Rejection must stay cheap: no salt, no derivation.
    group.bench_function("unsupported_algorithm", |b| {
        b.iter(|| {
            encrypt_password(black_box("correct horse"), UsersPasswordAlgorithm::Bcrypt)
                .unwrap_err()
        });
    });

    group.finish();
}

fn bench_validate_customizer(c: &mut Criterion) {
    let template = JwtCustomizer::template(JwtCustomizerKind::AccessToken).unwrap();
    let template = serde_json::to_value(template).unwrap();
    let rejected = json!({ "script": "", "abc": "abc" });

    c.bench_function("validate_template", |b| {
        b.iter(|| {
            validate(black_box(&template), JwtCustomizerKind::AccessToken, ValidationMode::Full)
                .unwrap()
        });
    });

    c.bench_function("validate_unknown_field", |b| {
        b.iter(|| {
            validate(black_box(&rejected), JwtCustomizerKind::AccessToken, ValidationMode::Full)
                .unwrap_err()
        });
    });
}

criterion_group!(benches, bench_encrypt_password, bench_validate_customizer);
criterion_main!(benches);
