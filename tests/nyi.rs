use std::panic;

use jittrap::config::BuildMode;
use jittrap::config::Config;
use jittrap::config::Features;
use jittrap::config::NyiPolicy;
use jittrap::config::Target;
use jittrap::error::FailureCode;
use jittrap::error::HostCode;
use jittrap::error::Site;
use jittrap::trap;
use jittrap::trap::Trap;

static ALT_SKIP: Config = Config::diagnostic()
  .with_target(Target::Amd64)
  .with_features(Features::ALT_JIT)
  .with_nyi_policy(NyiPolicy::Skip);

static ALT_PROCEED: Config = Config::diagnostic()
  .with_target(Target::Amd64)
  .with_features(Features::ALT_JIT)
  .with_nyi_policy(NyiPolicy::Proceed);

static LEGACY_X86: Config = Config::diagnostic()
  .with_target(Target::X86)
  .with_features(Features::LEGACY_BACKEND);

static LEGACY_X86_RELEASE: Config = Config::production()
  .with_target(Target::X86)
  .with_features(Features::LEGACY_BACKEND);

static ARM: Config = Config::diagnostic().with_target(Target::Arm);

static AMD64_STACK_FP: Config = Config::new()
  .with_mode(BuildMode::Diagnostic)
  .with_target(Target::Amd64)
  .with_features(Features::STACK_FP_X87);

fn ignore(_code: HostCode) {}

#[test]
fn skip_policy_reports_skipped() {
  let codes: (FailureCode, HostCode) = ALT_SKIP.scope(|| {
    Trap::new(&ignore, ()).run(
      |_| {
        jittrap::nyi!("tail calls");
        unreachable!()
      },
      |context| (context.code(), context.host_code()),
    )
  });

  assert_eq!(codes, (FailureCode::NotYetImplemented, HostCode::SKIPPED));
}

#[test]
fn proceed_policy_returns() {
  let reached: bool = ALT_PROCEED.scope(|| {
    Trap::new(&ignore, ()).run(
      |_| {
        jittrap::nyi!("tail calls");
        true
      },
      |_context| false,
    )
  });

  assert!(reached);
}

#[test]
fn default_path_consults_policy() {
  let code: FailureCode = ARM.scope(|| {
    Trap::new(&ignore, ()).run(
      |_| {
        jittrap::nyi_arm!("long shifts");
        FailureCode::Internal
      },
      |context| context.code(),
    )
  });

  assert_eq!(code, FailureCode::NotYetImplemented);

  let suppressed: bool = ARM.scope(|| {
    Trap::new(&ignore, ())
      .policy(|code: FailureCode, _site: &Site| code != FailureCode::NotYetImplemented)
      .run(
        |_| {
          jittrap::nyi!("long shifts");
          true
        },
        |_context| false,
      )
  });

  assert!(suppressed);
}

#[test]
fn nyi_if_evaluates_condition() {
  let code: FailureCode = ARM.scope(|| {
    Trap::new(&ignore, 3_u32).run(
      |locals| {
        jittrap::nyi_if!(*locals > 8, "many locals");
        jittrap::nyi_if!(*locals > 2, "some locals");
        FailureCode::Internal
      },
      |context| {
        let message: Option<&str> = context.failure().and_then(|failure| failure.message());
        assert_eq!(message, Some("NYI: some locals"));
        context.code()
      },
    )
  });

  assert_eq!(code, FailureCode::NotYetImplemented);
}

#[test]
fn per_target_macros_only_fire_on_target() {
  ARM.scope(|| {
    jittrap::nyi_amd64!("simd");
    jittrap::nyi_x86!("simd");
    jittrap::nyi_arm64!("simd");
  });

  let message: Option<String> = ARM.scope(|| {
    Trap::new(&ignore, ()).run(
      |_| {
        jittrap::nyi_arm!("simd");
        None
      },
      |context| context.failure().and_then(|failure| failure.message()).map(str::to_owned),
    )
  });

  assert_eq!(message.as_deref(), Some("NYI_ARM: simd"));
}

#[test]
fn flat_fp_nyi_respects_x87() {
  AMD64_STACK_FP.scope(|| jittrap::nyi_flat_fp_x87!("double compare"));
  LEGACY_X86_RELEASE.scope(|| jittrap::nyi_flat_fp_x87!("double compare"));

  let code: FailureCode = ARM.scope(|| {
    Trap::new(&ignore, ()).run(
      |_| {
        jittrap::nyi_flat_fp_x87!("double compare");
        FailureCode::Internal
      },
      |context| context.code(),
    )
  });

  assert_eq!(code, FailureCode::NotYetImplemented);
}

#[test]
fn legacy_backend_asserts() {
  let payload = LEGACY_X86.scope(|| {
    panic::catch_unwind(|| {
      Trap::new(&ignore, ()).run(|_| jittrap::nyi!("x87 spill"), |_context| ())
    })
  });

  let payload = payload.unwrap_err();

  assert!(!trap::is_failure(&*payload));
  assert_eq!(trap::depth(), 0);

  LEGACY_X86_RELEASE.scope(|| jittrap::nyi_x86!("x87 spill"));
}
