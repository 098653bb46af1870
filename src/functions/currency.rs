use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/* FX fee in instrument currency.

`fx_rate` is instrument units for ONE unit of account currency (e.g. USD per GBP), so converting
an account currency amount is a multiplication. Never divide here: the result would still look
plausible and silently corrupt the native cost.

None when the product does not fit in a Decimal.
*/
pub fn fx_fee_native(fx_fee_account: Decimal, fx_rate: Decimal, currencies_differ: bool) -> Option<Decimal> {
    if !currencies_differ {
        return Some(dec!(0));
    }
    return fx_fee_account.checked_mul(fx_rate);
}
