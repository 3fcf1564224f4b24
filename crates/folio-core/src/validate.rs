//! Field rules for inbound submissions.
//!
//! Every field is trimmed before it is checked. All rules run; nothing
//! short-circuits, so an empty name reports both that it is required and
//! that it is too short.

use std::{borrow::Cow, fmt};

use validator::{
  Validate, ValidateEmail, ValidateLength, ValidationError, ValidationErrors,
};

use crate::submission::{Field, Submission};

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Inclusive character bounds for a free-text field.
struct Bounds {
  min:     u64,
  max:     u64,
  message: &'static str,
}

const NAME_BOUNDS: Bounds = Bounds {
  min:     2,
  max:     100,
  message: "Name must be between 2 and 100 characters",
};

const SUBJECT_BOUNDS: Bounds = Bounds {
  min:     5,
  max:     200,
  message: "Subject must be between 5 and 200 characters",
};

const MESSAGE_BOUNDS: Bounds = Bounds {
  min:     10,
  max:     2000,
  message: "Message must be between 10 and 2000 characters",
};

const INVALID_EMAIL: &str = "Please enter a valid email address";

fn required_message(field: Field) -> &'static str {
  match field {
    Field::Name => "Name is required",
    Field::Email => "Email is required",
    Field::Subject => "Subject is required",
    Field::Message => "Message is required",
  }
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
  let mut err = ValidationError::new(code);
  err.message = Some(Cow::Borrowed(message));
  err
}

impl Submission {
  fn raw(&self, field: Field) -> &String {
    match field {
      Field::Name => &self.name,
      Field::Email => &self.email,
      Field::Subject => &self.subject,
      Field::Message => &self.message,
    }
  }
}

/// The domain must end in a label of at least two letters (or an IDNA
/// `xn--` label), so `jo@localhost` and `jo@host.1` are rejected.
fn has_tld(address: &str) -> bool {
  let Some((_, domain)) = address.rsplit_once('@') else {
    return false;
  };
  let Some((_, tld)) = domain.rsplit_once('.') else {
    return false;
  };
  tld.starts_with("xn--")
    || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}

impl Validate for Submission {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut broken = 0usize;

    for field in Field::ALL {
      let value = self.raw(field);
      let mut fail = |err: ValidationError| {
        errors.add(field.key(), err);
        broken += 1;
      };

      if value.is_empty() {
        fail(rule_error("required", required_message(field)));
      }

      let bounds = match field {
        Field::Name => Some(&NAME_BOUNDS),
        Field::Subject => Some(&SUBJECT_BOUNDS),
        Field::Message => Some(&MESSAGE_BOUNDS),
        Field::Email => None,
      };

      match bounds {
        Some(b) => {
          if !value.validate_length(Some(b.min), Some(b.max), None) {
            fail(rule_error("length", b.message));
          }
        }
        None => {
          if !value.validate_email() || !has_tld(value) {
            fail(rule_error("email", INVALID_EMAIL));
          }
        }
      }
    }

    if broken == 0 { Ok(()) } else { Err(errors) }
  }
}

// ─── Failure ─────────────────────────────────────────────────────────────────

/// Every rule a submission broke, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
  violations: Vec<(Field, String)>,
}

impl ValidationFailure {
  /// Flatten `validator`'s per-field map into a stable, form-ordered list.
  fn from_errors(errors: &ValidationErrors) -> Self {
    let by_field = errors.field_errors();
    let violations = Field::ALL
      .into_iter()
      .flat_map(|field| {
        by_field
          .get(field.key())
          .into_iter()
          .flat_map(|errs| errs.iter())
          .map(move |e| {
            let text = e
              .message
              .as_deref()
              .map(str::to_owned)
              .unwrap_or_else(|| e.code.to_string());
            (field, text)
          })
      })
      .collect();
    Self { violations }
  }

  pub fn violations(&self) -> &[(Field, String)] { &self.violations }

  /// The violation messages for one field.
  pub fn for_field(&self, field: Field) -> impl Iterator<Item = &str> {
    self
      .violations
      .iter()
      .filter(move |(f, _)| *f == field)
      .map(|(_, m)| m.as_str())
  }

  /// All messages joined with `". "`, ready for display.
  pub fn joined(&self) -> String {
    self
      .violations
      .iter()
      .map(|(_, m)| m.as_str())
      .collect::<Vec<_>>()
      .join(". ")
  }
}

impl fmt::Display for ValidationFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.joined())
  }
}

impl std::error::Error for ValidationFailure {}

// ─── Valid submission ────────────────────────────────────────────────────────

/// A submission that passed every rule. Fields are trimmed and the email is
/// normalized. Only obtainable through [`Submission::into_valid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
  name:    String,
  email:   String,
  subject: String,
  message: String,
}

impl ValidSubmission {
  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> &str { &self.email }

  pub fn subject(&self) -> &str { &self.subject }

  pub fn message(&self) -> &str { &self.message }
}

impl Submission {
  /// Copy of this submission with surrounding whitespace removed from every
  /// field.
  pub fn trimmed(&self) -> Self {
    Self::new(
      self.name.trim(),
      self.email.trim(),
      self.subject.trim(),
      self.message.trim(),
    )
  }

  /// Trim, check every rule and normalize.
  pub fn into_valid(self) -> Result<ValidSubmission, ValidationFailure> {
    let trimmed = self.trimmed();
    trimmed
      .validate()
      .map_err(|e| ValidationFailure::from_errors(&e))?;

    Ok(ValidSubmission {
      email:   normalize_email(&trimmed.email),
      name:    trimmed.name,
      subject: trimmed.subject,
      message: trimmed.message,
    })
  }
}

// ─── Email normalization ─────────────────────────────────────────────────────

const OUTLOOK_DOMAINS: &[&str] = &[
  "hotmail.at", "hotmail.be", "hotmail.ca", "hotmail.cl", "hotmail.co.il",
  "hotmail.co.nz", "hotmail.co.th", "hotmail.co.uk", "hotmail.com",
  "hotmail.com.ar", "hotmail.com.au", "hotmail.com.br", "hotmail.com.gr",
  "hotmail.com.mx", "hotmail.com.pe", "hotmail.com.tr", "hotmail.com.vn",
  "hotmail.cz", "hotmail.de", "hotmail.dk", "hotmail.es", "hotmail.fr",
  "hotmail.hu", "hotmail.id", "hotmail.ie", "hotmail.in", "hotmail.it",
  "hotmail.jp", "hotmail.kr", "hotmail.lv", "hotmail.my", "hotmail.ph",
  "hotmail.pt", "hotmail.sa", "hotmail.sg", "hotmail.sk", "live.be",
  "live.co.uk", "live.com", "live.com.ar", "live.com.mx", "live.de",
  "live.es", "live.eu", "live.fr", "live.it", "live.nl", "msn.com",
  "outlook.at", "outlook.be", "outlook.cl", "outlook.co.il", "outlook.co.nz",
  "outlook.co.th", "outlook.com", "outlook.com.ar", "outlook.com.au",
  "outlook.com.br", "outlook.com.gr", "outlook.com.pe", "outlook.com.tr",
  "outlook.com.vn", "outlook.cz", "outlook.de", "outlook.dk", "outlook.es",
  "outlook.fr", "outlook.hu", "outlook.id", "outlook.ie", "outlook.in",
  "outlook.it", "outlook.jp", "outlook.kr", "outlook.lv", "outlook.my",
  "outlook.ph", "outlook.pt", "outlook.sa", "outlook.sg", "outlook.sk",
  "passport.com",
];

const YAHOO_DOMAINS: &[&str] = &[
  "rocketmail.com", "yahoo.ca", "yahoo.co.uk", "yahoo.com", "yahoo.de",
  "yahoo.fr", "yahoo.in", "yahoo.it", "ymail.com",
];

const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com"];

/// Lower-case the address and fold provider aliases:
///
/// - gmail/googlemail: dots and `+tag` dropped, domain becomes `gmail.com`
/// - outlook/hotmail/live/msn: `+tag` dropped
/// - yahoo/ymail/rocketmail: the last `-tag` dropped
/// - icloud/me.com: `+tag` dropped
///
/// A local part that would end up empty is left as it was.
pub fn normalize_email(address: &str) -> String {
  let lower = address.trim().to_lowercase();
  let Some((local, domain)) = lower.rsplit_once('@') else {
    return lower;
  };

  let before_plus = || local.split('+').next().unwrap_or(local);

  let (folded, domain) = if domain == "gmail.com" || domain == "googlemail.com" {
    (before_plus().replace('.', ""), "gmail.com")
  } else if OUTLOOK_DOMAINS.contains(&domain) || ICLOUD_DOMAINS.contains(&domain) {
    (before_plus().to_owned(), domain)
  } else if YAHOO_DOMAINS.contains(&domain) {
    let base = local.rsplit_once('-').map_or(local, |(base, _)| base);
    (base.to_owned(), domain)
  } else {
    (local.to_owned(), domain)
  };

  if folded.is_empty() {
    return lower;
  }
  format!("{folded}@{domain}")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> Submission {
    Submission::new(
      "Jo Doe",
      "jo@example.com",
      "Project Inquiry",
      "I would like to discuss a project with you.",
    )
  }

  #[test]
  fn accepts_valid_submission_and_trims() {
    let mut s = valid();
    s.name = "   Jo Doe  ".into();
    s.message = "\n I would like to discuss a project with you. \t".into();

    let v = s.into_valid().unwrap();
    assert_eq!(v.name(), "Jo Doe");
    assert_eq!(v.message(), "I would like to discuss a project with you.");
  }

  #[test]
  fn bounds_are_inclusive() {
    let s = Submission::new(
      "Jo",
      "a@b.co",
      "Hello",
      "0123456789",
    );
    assert!(s.into_valid().is_ok());

    let s = Submission::new(
      "n".repeat(100),
      "a@b.co",
      "s".repeat(200),
      "m".repeat(2000),
    );
    assert!(s.into_valid().is_ok());
  }

  #[test]
  fn one_past_each_bound_fails() {
    let cases = [
      (Field::Name, "J".to_string()),
      (Field::Name, "n".repeat(101)),
      (Field::Subject, "Hiya".to_string()),
      (Field::Subject, "s".repeat(201)),
      (Field::Message, "123456789".to_string()),
      (Field::Message, "m".repeat(2001)),
    ];

    for (field, value) in cases {
      let failure = valid().with_field(field, value.clone()).into_valid().unwrap_err();
      assert_eq!(
        failure.violations().len(),
        1,
        "{field} = {} chars: {failure}",
        value.chars().count()
      );
      assert_eq!(failure.violations()[0].0, field);
    }
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    // Two characters, four bytes.
    let s = valid().with_field(Field::Name, "Żó");
    assert!(s.into_valid().is_ok());
  }

  #[test]
  fn whitespace_only_is_required_violation() {
    let failure = valid()
      .with_field(Field::Subject, "      ")
      .into_valid()
      .unwrap_err();
    let msgs: Vec<_> = failure.for_field(Field::Subject).collect();
    assert_eq!(
      msgs,
      ["Subject is required", "Subject must be between 5 and 200 characters"]
    );
  }

  #[test]
  fn bad_email_is_rejected() {
    let failure = valid()
      .with_field(Field::Email, "bad-email")
      .into_valid()
      .unwrap_err();
    assert_eq!(failure.joined(), "Please enter a valid email address");
  }

  #[test]
  fn reports_every_violation_in_form_order() {
    let failure = Submission::new("J", "bad-email", "Hi", "short")
      .into_valid()
      .unwrap_err();
    assert_eq!(
      failure.joined(),
      "Name must be between 2 and 100 characters. \
       Please enter a valid email address. \
       Subject must be between 5 and 200 characters. \
       Message must be between 10 and 2000 characters"
    );
  }

  #[test]
  fn empty_submission_reports_required_and_bounds() {
    let failure = Submission::default().into_valid().unwrap_err();
    let msgs: Vec<_> = failure.for_field(Field::Email).collect();
    assert_eq!(msgs, ["Email is required", INVALID_EMAIL]);
    assert_eq!(failure.violations().len(), 8);
  }

  #[test]
  fn normalizes_email() {
    assert_eq!(normalize_email("Jo@Example.COM"), "jo@example.com");
    assert_eq!(normalize_email("J.O.Doe+folio@GoogleMail.com"), "jodoe@gmail.com");
    assert_eq!(normalize_email("jo.doe+tag@example.com"), "jo.doe+tag@example.com");
  }

  #[test]
  fn normalizes_provider_subaddresses() {
    assert_eq!(normalize_email("Jo+folio@Outlook.com"), "jo@outlook.com");
    assert_eq!(normalize_email("jo.doe+x@hotmail.co.uk"), "jo.doe@hotmail.co.uk");
    assert_eq!(normalize_email("jo+x@live.com"), "jo@live.com");
    assert_eq!(normalize_email("jo-doe-folio@yahoo.com"), "jo-doe@yahoo.com");
    assert_eq!(normalize_email("jodoe@ymail.com"), "jodoe@ymail.com");
    assert_eq!(normalize_email("jo+apple@iCloud.com"), "jo@icloud.com");
    assert_eq!(normalize_email("jo+apple@me.com"), "jo@me.com");
    // Nothing left of the local part: keep it.
    assert_eq!(normalize_email("+tag@gmail.com"), "+tag@gmail.com");
  }

  #[test]
  fn email_without_tld_is_rejected() {
    for bad in ["jo@localhost", "jo@example.c", "jo@host.123", "jo@example."] {
      let failure = valid()
        .with_field(Field::Email, bad)
        .into_valid()
        .unwrap_err();
      assert_eq!(failure.joined(), INVALID_EMAIL, "{bad}");
    }
    assert!(valid().with_field(Field::Email, "jo@example.io").into_valid().is_ok());
  }

  #[test]
  fn valid_submission_carries_normalized_email() {
    let v = valid()
      .with_field(Field::Email, "  Jo@Example.com ")
      .into_valid()
      .unwrap();
    assert_eq!(v.email(), "jo@example.com");
  }
}
