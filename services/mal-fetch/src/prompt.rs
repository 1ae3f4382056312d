//! Terminal prompts for the first-run credential and authorization steps
//!
//! Prompts go to stderr so stdout stays machine-readable JSON. The client
//! secret is read without echo.

use std::io::{self, BufRead, Write};

/// Ask for the client id and secret on stdin.
pub fn read_credentials() -> io::Result<(String, String)> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    credentials_from(&mut input, &mut output, rpassword::read_password)
}

/// Show the authorization URL and read back the code the provider issued.
pub fn read_authorization_code(url: &str) -> io::Result<String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    authorization_code_from(url, &mut input, &mut output)
}

fn credentials_from<R, W, S>(input: &mut R, output: &mut W, read_secret: S) -> io::Result<(String, String)>
where
    R: BufRead,
    W: Write,
    S: FnOnce() -> io::Result<String>,
{
    writeln!(output, "No client credentials found. Create an API client on MyAnimeList and paste its values.")?;
    let client_id = ask(input, output, "Client ID: ")?;

    write!(output, "Client Secret (hidden): ")?;
    output.flush()?;
    let client_secret = read_secret()?;
    Ok((client_id, client_secret.trim().to_owned()))
}

fn authorization_code_from<R: BufRead, W: Write>(url: &str, input: &mut R, output: &mut W) -> io::Result<String> {
    writeln!(output, "Open this URL in a browser and authorize the application:")?;
    writeln!(output, "{url}")?;
    ask(input, output, "Authorization code: ")
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("input closed while waiting for {}", label.trim_end_matches([':', ' '])),
        ));
    }
    Ok(line.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn credentials_read_id_visibly_and_secret_hidden() {
        let mut input = Cursor::new("  my-id \n");
        let mut secret_input = Cursor::new("my-secret\n");
        let mut output = Vec::new();

        let (id, secret) = credentials_from(&mut input, &mut output, || {
            rpassword::read_password_from_bufread(&mut secret_input)
        })
        .unwrap();
        assert_eq!(id, "my-id");
        assert_eq!(secret, "my-secret");

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Client ID: "));
        assert!(shown.contains("Client Secret (hidden): "));
        assert!(!shown.contains("my-secret"), "secret must not be echoed: {shown}");
    }

    #[test]
    fn secret_reader_failure_is_reported() {
        let mut input = Cursor::new("my-id\n");
        let mut output = Vec::new();

        let err = credentials_from(&mut input, &mut output, || {
            Err(io::Error::other("no tty"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "no tty");
    }

    #[test]
    fn authorization_prompt_shows_url() {
        let mut input = Cursor::new("def502\n");
        let mut output = Vec::new();

        let code = authorization_code_from("https://example.test/authorize?x=1", &mut input, &mut output).unwrap();
        assert_eq!(code, "def502");
        assert!(String::from_utf8(output).unwrap().contains("https://example.test/authorize?x=1\n"));
    }

    #[test]
    fn closed_input_is_unexpected_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        let err = credentials_from(&mut input, &mut output, || panic!("secret must not be read"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(err.to_string().contains("Client ID"), "got: {err}");
    }
}
