// src/messages.rs

pub fn signature_length_message(length: usize) -> String {
    format!(
        "Signed challenge must be exactly {} symbols. You sent a string with {} symbols",
        crate::identity::SIGNATURE_HEX_LEN,
        length
    )
}

pub fn invalid_signature_message() -> String {
    "❌ **Signature Check Failed**\n\n\
    The signature does not match the challenge and the account you are claiming.\n\
    Make sure you signed the exact challenge text with the account shown in `/claim`, then run `/solve` again."
        .to_string()
}

pub fn already_claimed_message() -> String {
    "🤔 This identity seems to be already claimed".to_string()
}

pub fn claim_success_message(membership: &str) -> String {
    format!(
        "✅ **Congrats!**\n\n\
        You have successfully claimed membership **{}**.",
        membership
    )
}

pub fn try_again_message() -> String {
    "Well, this is embarrassing, but I have to ask you to try again later.".to_string()
}

pub fn challenge_message(handle: &str, account: &str, challenge: &str) -> String {
    format!(
        "🔐 **Claiming membership {}**\n\n\
        1. Sign the challenge below with account `{}` (for example in the Polkadot.js extension, *Sign message*).\n\
        2. Run `/solve` with the resulting signature (`0x` followed by 128 hex characters).\n\n\
        **Challenge:**\n`{}`",
        handle, account, challenge
    )
}

pub fn membership_not_found_message(handle: &str) -> String {
    format!(
        "❌ **Membership Not Found**\n\n\
        No membership with handle `{}` was found on chain. Please check the handle and try again.",
        handle
    )
}
