// PEM and X.509 helpers

use x509_parser::prelude::*;

/// Extract every certificate from a PEM string as DER bytes.
///
/// Non-certificate blocks (keys, parameters) and undecodable blocks are
/// skipped rather than treated as errors.
pub fn certificates(pem: &str) -> Vec<Vec<u8>> {
    let mut reader = std::io::BufReader::new(pem.as_bytes());
    rustls_pemfile::certs(&mut reader)
        .filter_map(|cert| cert.ok())
        .map(|cert| cert.to_vec())
        .collect()
}

/// Whether the DER-encoded certificate carries a subjectAltName extension.
///
/// A certificate that fails to parse counts as not carrying one.
pub fn has_subject_alt_name(der: &[u8]) -> bool {
    let Ok((_, cert)) = X509Certificate::from_der(der) else {
        return false;
    };
    cert.extensions().iter().any(|ext| {
        matches!(
            ext.parsed_extension(),
            ParsedExtension::SubjectAlternativeName(_)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // SAN: test-with-san.com
    const CERT_WITH_SAN: &str = "-----BEGIN CERTIFICATE-----
MIIESjCCAjKgAwIBAgIRAMLNrkeAdcANSxOHGdVhsfowDQYJKoZIhvcNAQELBQAw
EjEQMA4GA1UEAxMHdGVzdC1jYTAeFw0yMTEwMjExNzA0MDFaFw0yMzA0MjExNjI5
MDVaMBwxGjAYBgNVBAMTEXRlc3Qtd2l0aC1zYW4uY29tMIIBIjANBgkqhkiG9w0B
AQEFAAOCAQ8AMIIBCgKCAQEA3q+N8Se+LMXjanIBlkHhzrcKT71C0T6iB64jvyCJ
oQ0Z63M7pRs7h1YZV37KJCE3/QuIt6Atw/EA88/yIvSxWw9ytVQntzqtcKambC3b
8qGWxpF9piktyzZjpXJvTIWrYYyCOlZM1QkJ976O76+yoZM2Ttp36n1OqIX2DpEt
XJ9/VoMDBhQ/TvEAUdEUP0GFrBrUP7WoSLOjRnEn8gPvuGMQ7QDjx+EWScAaDz3c
R3X7UGa5w7+RdcZ6zhKlftg7D1+XMgCelsZjxZjEECNF7p/YhaSLhgKN/XZ5CtEt
5sa1EVSQmiIb715B8ee8BjwUEzD9VteYdCaH6YivoeDyzQIDAQABo4GQMIGNMA4G
A1UdDwEB/wQEAwIDuDAdBgNVHSUEFjAUBggrBgEFBQcDAQYIKwYBBQUHAwIwHQYD
VR0OBBYEFCtWb9SZGcuTEmthC8enxyYwHbXSMB8GA1UdIwQYMBaAFBIf8JzVENnJ
GH272x8d5Ld5ZjNMMBwGA1UdEQQVMBOCEXRlc3Qtd2l0aC1zYW4uY29tMA0GCSqG
SIb3DQEBCwUAA4ICAQDIwIxeB5F1DC48OtDiHj2pbX0O7IsWwax6SAlY+j0taQuy
EMDuBWYXw1sDdnTHY+AytymRd8KFNdCzzsZhflLwp+iZ9zb81xS7IfdOo3KV6dc/
zEtaU0B2aP1Q7yfdl9TwZ0FNoSf0AZYLizr85KcW1LStWypiegY/7CcuwrUnXiZB
Lg8/YM5BTd2rZIgnid4d2fvp2KgcU1ztiCCJVGkty/LKtwwJxrjvuwGxjJVWRcjq
l1VObuX8HYHufn62EW3L1WL5TMYd5t34eXo1KAjv+FGqD280SjwFFaaOZ5qfYkx1
wcItuinnx6m2TtSB8Rj/QFdItLVhEOTxoPbmMi0iVw/fYEcqUBn4OIDPBZbKzlcU
jizmjv8waQlFgZbLKZBDYht3+x45k9+IWViLl5IPM4I4cVj9kYRUr0GOlPxBYRkW
0evndFjeCka24cjdW1/b7NHq9uCRDj/Px+i0oUfvEAVQU94N/Pir3nuUIKpkx/TQ
A1xXeONZVuGuarQmcRN9gCC3FUbnkh1lUO4qgFE8iIKnOtFeUnMdiBcWPmRaOJRI
BdgLIJDrTJStUc4OcZSE6gBkHAt0SAtST7BcLyholehyvheFw4nWUOEvEs1p/bkY
NexOrpDV8Ump01u0IPyZZv/LNNaWX1wpxbjusVYZCxCfTO2d7s/VQSdRsyH5Hg==
-----END CERTIFICATE-----";

    // CN only, no subjectAltName extension
    const CERT_WITHOUT_SAN: &str = "-----BEGIN CERTIFICATE-----
MIIEITCCAgmgAwIBAgIRAMGCNmHhXZnK1fSdCinKK9owDQYJKoZIhvcNAQELBQAw
EjEQMA4GA1UEAxMHdGVzdC1jYTAeFw0yMTEwMjExNjU2NTJaFw0yMzA0MjExNjI5
MDVaMBMxETAPBgNVBAMTCHRlc3QuY29tMIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8A
MIIBCgKCAQEAwY9FO90qNGnztTlPSUODTLvdKex08dA+/hQ2URMBStqI5g6dJZP9
RcLVyRpp9719KKs2PL2ol/QEfUMXKSB1pld6kRGFEXbPkz8rxLhYt79UzjAC8lWj
z/NbyIvNVzqgYlB7Tk+sgIBF3LSV3Zh4ZsrNoXMu/VDG+ODm/1dcLZJE3QXaMM6Z
nbvdy/eUOhJ12BzgM+1PKjNi93azOB6uBiXZ1QgzWbmWJHnGmvX/HUdT8s4e1snt
5mAsS7hmsrxpu2QD9b3gGUIgy6z6ZuFp1kq0S5HxoFDNjvi88p2E4Jk+unfFMaO9
4+OyOZWW5TqyyhTYCrhBEcZ4m5hm82v76wIDAQABo3EwbzAOBgNVHQ8BAf8EBAMC
A7gwHQYDVR0lBBYwFAYIKwYBBQUHAwEGCCsGAQUFBwMCMB0GA1UdDgQWBBRZ7D+U
LkHi0vbszx8bMG2LZSqUejAfBgNVHSMEGDAWgBQSH/Cc1RDZyRh9u9sfHeS3eWYz
TDANBgkqhkiG9w0BAQsFAAOCAgEA1YluE0iSE4HEc2N2fdYhmwF2LP3pjUfmzF/g
NcxjhydQUoxyOxf6+1RsNe7taXQRLhmpN2JaiE8yCf+wDciIhRWnqyHgJEKoJgK6
4liu7JUpOFgAloe8koKhWxEerkU4VcPy8kN5gZ8I6b8Mso4hTq2O5NhntqKDFRS0
v0ZpMkz1PhWwI79No8WXU0tUwx5pT3mcwjCr57mnyYWmeHqAXgnUI4U0QnSyr3sa
jmjpLk2TncpC3CSTr1AbOhm/yglsrbLllvufHUbYv5QNlzkOauvgCzvXQ4ScFttn
epDzPE8PrsY8N/26BwOCc6ftQqabhpIKzT6w6DN5xYRZi5fyzRNho5+5RuBDRKmL
AGfrpiixm4zzgUL7jVlOVlZXQ/vkQ+h4+aqS2ssRwPoqGxilFxfUMgO+hr3jZkxz
o9Z7Yeljt7rzeYESEDtkwou+75LHzfKduVT8Kxwn8LwiB0trgbcx3qj2ab8fucM4
UUXAXr6ve5DcdkKevLoNypq2kCh7hySjrjDp/gnCMhuc0ch8oV2RV2ZlA+QOD+J4
VAgYLhy03ZZaUFvmGhCx+FEkkzq/d2GGWuNd1T2MMkTBplf+pK+3l+jHxYuSc8DR
gPYhs8i50bWlTVu/yJgJGBzAmWcybfi7NmUkQyYHmpLP3GRbtdI+eESF9vAJpKSs
ONppgXo=
-----END CERTIFICATE-----";

    #[test]
    fn test_pem_without_certificate_yields_nothing() {
        assert!(certificates("not a pem at all").is_empty());
        assert!(certificates("").is_empty());
    }

    #[test]
    fn test_san_detected() {
        let certs = certificates(CERT_WITH_SAN);
        assert_eq!(certs.len(), 1);
        assert!(has_subject_alt_name(&certs[0]));
    }

    #[test]
    fn test_cert_without_san() {
        let certs = certificates(CERT_WITHOUT_SAN);
        assert_eq!(certs.len(), 1);
        assert!(!has_subject_alt_name(&certs[0]));
    }

    #[test]
    fn test_concatenated_blocks_all_extracted() {
        let bundle = format!("{CERT_WITH_SAN}\n{CERT_WITHOUT_SAN}");
        assert_eq!(certificates(&bundle).len(), 2);
    }

    #[test]
    fn test_garbage_der_has_no_san() {
        assert!(!has_subject_alt_name(b"\x30\x03\x02\x01\x01"));
    }
}
