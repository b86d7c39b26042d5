//! Certificate fixtures for tests.

use rcgen::{
    date_time_ymd, BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    IsCa, KeyPair,
};

/// A generated certificate together with its private key.
pub struct Issued {
    pub cert: Certificate,
    pub key: KeyPair,
}

fn params(common_name: &str, sans: &[&str]) -> CertificateParams {
    let sans: Vec<String> = sans.iter().map(|s| (*s).to_owned()).collect();
    let mut params = CertificateParams::new(sans).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    params.not_before = date_time_ymd(2024, 1, 1);
    params.not_after = date_time_ymd(2099, 1, 1);
    params
}

/// Self-signed CA certificate.
pub fn ca(common_name: &str) -> Issued {
    let mut params = params(common_name, &[]);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    Issued { cert, key }
}

/// End-entity certificate signed by `issuer`.
pub fn leaf(common_name: &str, sans: &[&str], issuer: &Issued) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = params(common_name, sans)
        .signed_by(&key, &issuer.cert, &issuer.key)
        .unwrap();
    Issued { cert, key }
}
