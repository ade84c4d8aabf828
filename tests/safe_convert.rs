use jittrap::config::Config;
use jittrap::convert::safe_cvt_assert;
use jittrap::convert::safe_cvt_noway;
use jittrap::error::FailureCode;
use jittrap::error::HostCode;
use jittrap::error::Site;
use jittrap::trap::Trap;

static PRODUCTION: Config = Config::production();

fn ignore(_code: HostCode) {}

fn narrow(value: i64) -> Result<i32, FailureCode> {
  Trap::new(&ignore, value).run(
    |value| Ok(safe_cvt_noway::<i32, i64>(*value)),
    |context| Err(context.code()),
  )
}

#[test]
fn noway_conversion_in_range() {
  assert_eq!(narrow(42), Ok(42));
  assert_eq!(narrow(i64::from(i32::MIN)), Ok(i32::MIN));
}

#[test]
fn noway_conversion_out_of_range_raises() {
  assert_eq!(narrow(5_000_000_000), Err(FailureCode::ConditionalInvariant));
  assert_eq!(narrow(-5_000_000_000), Err(FailureCode::ConditionalInvariant));
}

#[test]
fn noway_conversion_sign_change() {
  let code: Result<u32, FailureCode> = PRODUCTION.scope(|| {
    Trap::new(&ignore, ()).run(
      |_| Ok(safe_cvt_noway::<u32, i8>(-1)),
      |context| Err(context.code()),
    )
  });

  assert_eq!(code, Err(FailureCode::ConditionalInvariant));
  assert_eq!(safe_cvt_noway::<i8, u32>(127), 127);
}

#[test]
fn noway_conversion_ignores_policy() {
  let never = |_: FailureCode, _: &Site| false;

  let result: Result<u16, FailureCode> = Trap::new(&ignore, ()).policy(never).run(
    |_| Ok(safe_cvt_noway::<u16, i32>(70_000)),
    |context| Err(context.code()),
  );

  assert_eq!(result, Err(FailureCode::ConditionalInvariant));
}

#[test]
fn assert_conversion_in_range() {
  assert_eq!(safe_cvt_assert::<u8, u64>(255), 255);
  assert_eq!(safe_cvt_assert::<i64, u32>(u32::MAX), i64::from(u32::MAX));
}

#[test]
#[should_panic(expected = "does not fit in u8")]
fn assert_conversion_out_of_range_panics() {
  Trap::new(&ignore, ()).run(
    |_| {
      safe_cvt_assert::<u8, i32>(256);
    },
    |_context| (),
  );
}
