//! Token-2022 mints carrying embedded metadata: NFT groups and members, and
//! fungible mints with optional authority extensions.
//!
//! Pointer and authority extensions are written before `InitializeMint`, the
//! metadata extension after it. Each group or member mint is created,
//! initialized, minted once and stripped of its mint authority in a single
//! transaction.

use forge_client::rpc::{RpcConnection, SendOptions};
use solana_sdk::{
    instruction::Instruction, program_error::ProgramError, pubkey::Pubkey, signature::Keypair,
    signer::Signer, system_instruction,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::{create_associated_token_account, create_associated_token_account_idempotent},
};
use spl_token_2022::{
    extension::{group_member_pointer, group_pointer, metadata_pointer, ExtensionType},
    instruction::{
        initialize_mint, initialize_mint_close_authority, initialize_permanent_delegate, mint_to,
        set_authority, AuthorityType,
    },
    state::Mint,
};
use spl_token_group_interface::instruction::{initialize_group, initialize_member};
use spl_token_metadata_interface::state::TokenMetadata;
use tracing::debug;

use crate::{errors::MintError, programs::SPL_TOKEN_2022_ID};

pub const COMPUTE_UNIT_LIMIT: u32 = 500_000;
pub const DEFAULT_GROUP_MAX_SIZE: u32 = 1000;
pub const FUNGIBLE_DECIMALS: u8 = 6;
/// One million whole tokens.
pub const FUNGIBLE_SUPPLY: u64 = 1_000_000 * 10u64.pow(FUNGIBLE_DECIMALS as u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadataArgs {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenMetadataArgs {
    fn tlv_size(&self, mint: &Pubkey) -> Result<usize, ProgramError> {
        TokenMetadata {
            mint: *mint,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            uri: self.uri.clone(),
            ..Default::default()
        }
        .tlv_size_of()
    }
}

/// Accounts shared by group and member mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionMintAccounts {
    pub payer: Pubkey,
    /// Mint, freeze, pointer and metadata update authority.
    pub authority: Pubkey,
    pub mint: Pubkey,
    /// Receives the single minted unit.
    pub beneficiary: Pubkey,
    /// Takes over freeze and pointer authority when set.
    pub final_authority: Option<Pubkey>,
}

/// Lamports funding a new mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionMintRent {
    pub mint_len: usize,
    pub mint_lamports: u64,
    /// Top up for the metadata written after `InitializeMint`.
    pub metadata_lamports: u64,
}

/// Group a member mint joins. `update_authority` co-signs the member
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionGroup {
    pub group: Pubkey,
    pub update_authority: Pubkey,
}

pub fn group_extensions() -> Vec<ExtensionType> {
    vec![ExtensionType::GroupPointer, ExtensionType::MetadataPointer]
}

pub fn member_extensions(with_group: bool) -> Vec<ExtensionType> {
    let mut extensions = vec![ExtensionType::MetadataPointer];
    if with_group {
        extensions.push(ExtensionType::GroupMemberPointer);
    }
    extensions
}

pub async fn extension_mint_rent<R: RpcConnection>(
    rpc: &R,
    extensions: &[ExtensionType],
    mint: &Pubkey,
    metadata: &TokenMetadataArgs,
) -> Result<ExtensionMintRent, MintError> {
    let mint_len = ExtensionType::try_calculate_account_len::<Mint>(extensions)?;
    let metadata_len = metadata.tlv_size(mint)?;
    Ok(ExtensionMintRent {
        mint_len,
        mint_lamports: rpc.get_minimum_balance_for_rent_exemption(mint_len).await?,
        metadata_lamports: rpc
            .get_minimum_balance_for_rent_exemption(metadata_len)
            .await?,
    })
}

fn initialize_metadata_instructions(
    payer: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    metadata: &TokenMetadataArgs,
    rent: &ExtensionMintRent,
) -> Vec<Instruction> {
    vec![
        system_instruction::transfer(payer, mint, rent.metadata_lamports),
        spl_token_metadata_interface::instruction::initialize(
            &SPL_TOKEN_2022_ID,
            mint,
            authority,
            mint,
            authority,
            metadata.name.clone(),
            metadata.symbol.clone(),
            metadata.uri.clone(),
        ),
    ]
}

fn final_authority_instructions(
    accounts: &ExtensionMintAccounts,
    pointer_authority: AuthorityType,
) -> Result<Vec<Instruction>, ProgramError> {
    let Some(final_authority) = accounts.final_authority else {
        return Ok(Vec::new());
    };
    [AuthorityType::FreezeAccount, pointer_authority]
        .into_iter()
        .map(|authority_type| {
            set_authority(
                &SPL_TOKEN_2022_ID,
                &accounts.mint,
                Some(&final_authority),
                authority_type,
                &accounts.authority,
                &[],
            )
        })
        .collect()
}

/// Creates the beneficiary's token account, mints one unit and drops the mint
/// authority.
fn mint_single_unit_instructions(
    accounts: &ExtensionMintAccounts,
) -> Result<Vec<Instruction>, ProgramError> {
    let token_account = get_associated_token_address_with_program_id(
        &accounts.beneficiary,
        &accounts.mint,
        &SPL_TOKEN_2022_ID,
    );
    Ok(vec![
        create_associated_token_account(
            &accounts.payer,
            &accounts.beneficiary,
            &accounts.mint,
            &SPL_TOKEN_2022_ID,
        ),
        mint_to(
            &SPL_TOKEN_2022_ID,
            &accounts.mint,
            &token_account,
            &accounts.authority,
            &[],
            1,
        )?,
        set_authority(
            &SPL_TOKEN_2022_ID,
            &accounts.mint,
            None,
            AuthorityType::MintTokens,
            &accounts.authority,
            &[],
        )?,
    ])
}

pub fn create_group_instructions(
    accounts: &ExtensionMintAccounts,
    metadata: &TokenMetadataArgs,
    max_size: u32,
    rent: &ExtensionMintRent,
) -> Result<Vec<Instruction>, ProgramError> {
    let mint = &accounts.mint;
    let authority = &accounts.authority;

    let mut instructions = vec![
        system_instruction::create_account(
            &accounts.payer,
            mint,
            rent.mint_lamports,
            rent.mint_len as u64,
            &SPL_TOKEN_2022_ID,
        ),
        group_pointer::instruction::initialize(
            &SPL_TOKEN_2022_ID,
            mint,
            Some(*authority),
            Some(*mint),
        )?,
        metadata_pointer::instruction::initialize(
            &SPL_TOKEN_2022_ID,
            mint,
            Some(*authority),
            Some(*mint),
        )?,
        initialize_mint(&SPL_TOKEN_2022_ID, mint, authority, Some(authority), 0)?,
        initialize_group(
            &SPL_TOKEN_2022_ID,
            mint,
            mint,
            authority,
            Some(*authority),
            max_size,
        ),
    ];
    instructions.extend(initialize_metadata_instructions(
        &accounts.payer,
        authority,
        mint,
        metadata,
        rent,
    ));
    instructions.extend(final_authority_instructions(
        accounts,
        AuthorityType::GroupPointer,
    )?);
    instructions.extend(mint_single_unit_instructions(accounts)?);
    Ok(instructions)
}

pub fn create_member_instructions(
    accounts: &ExtensionMintAccounts,
    metadata: &TokenMetadataArgs,
    group: Option<&ExtensionGroup>,
    rent: &ExtensionMintRent,
) -> Result<Vec<Instruction>, ProgramError> {
    let mint = &accounts.mint;
    let authority = &accounts.authority;

    let mut instructions = vec![
        system_instruction::create_account(
            &accounts.payer,
            mint,
            rent.mint_lamports,
            rent.mint_len as u64,
            &SPL_TOKEN_2022_ID,
        ),
        metadata_pointer::instruction::initialize(
            &SPL_TOKEN_2022_ID,
            mint,
            Some(*authority),
            Some(*mint),
        )?,
    ];
    if group.is_some() {
        instructions.push(group_member_pointer::instruction::initialize(
            &SPL_TOKEN_2022_ID,
            mint,
            Some(*authority),
            Some(*mint),
        )?);
    }
    instructions.push(initialize_mint(
        &SPL_TOKEN_2022_ID,
        mint,
        authority,
        Some(authority),
        0,
    )?);
    if let Some(group) = group {
        instructions.push(initialize_member(
            &SPL_TOKEN_2022_ID,
            mint,
            mint,
            authority,
            &group.group,
            &group.update_authority,
        ));
    }
    instructions.extend(initialize_metadata_instructions(
        &accounts.payer,
        authority,
        mint,
        metadata,
        rent,
    ));
    instructions.extend(final_authority_instructions(
        accounts,
        AuthorityType::GroupMemberPointer,
    )?);
    instructions.extend(mint_single_unit_instructions(accounts)?);
    Ok(instructions)
}

/// Builds a fungible mint with `FUNGIBLE_DECIMALS` decimals. `authority`
/// holds the mint and freeze authority and every requested authority
/// extension.
///
/// Of `extensions`, `MintCloseAuthority`, `PermanentDelegate` and
/// `MetadataPointer` are initialized, in that order. Any other extension only
/// adds space to the account. Metadata is embedded only when the mint carries a
/// `MetadataPointer`, since Token-2022 refuses metadata the pointer does not
/// reference.
pub fn create_token_extension_mint_instructions(
    payer: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    extensions: &[ExtensionType],
    metadata: &TokenMetadataArgs,
    rent: &ExtensionMintRent,
) -> Result<Vec<Instruction>, ProgramError> {
    let mut instructions = vec![system_instruction::create_account(
        payer,
        mint,
        rent.mint_lamports,
        rent.mint_len as u64,
        &SPL_TOKEN_2022_ID,
    )];
    if extensions.contains(&ExtensionType::MintCloseAuthority) {
        instructions.push(initialize_mint_close_authority(
            &SPL_TOKEN_2022_ID,
            mint,
            Some(authority),
        )?);
    }
    if extensions.contains(&ExtensionType::PermanentDelegate) {
        instructions.push(initialize_permanent_delegate(
            &SPL_TOKEN_2022_ID,
            mint,
            authority,
        )?);
    }
    let with_metadata = extensions.contains(&ExtensionType::MetadataPointer);
    if with_metadata {
        instructions.push(metadata_pointer::instruction::initialize(
            &SPL_TOKEN_2022_ID,
            mint,
            Some(*authority),
            Some(*mint),
        )?);
    }
    instructions.push(initialize_mint(
        &SPL_TOKEN_2022_ID,
        mint,
        authority,
        Some(authority),
        FUNGIBLE_DECIMALS,
    )?);
    if with_metadata {
        instructions.extend(initialize_metadata_instructions(
            payer, authority, mint, metadata, rent,
        ));
    }
    Ok(instructions)
}

/// Mints `amount` to `owner`'s token account, creating it if needed, then
/// revokes the permanent delegate and close authority (when the mint has
/// them) and the freeze authority. The mint authority is kept.
pub fn mint_tokens_and_revoke_authorities_instructions(
    payer: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    extensions: &[ExtensionType],
) -> Result<Vec<Instruction>, ProgramError> {
    let token_account = get_associated_token_address_with_program_id(owner, mint, &SPL_TOKEN_2022_ID);
    let mut instructions = vec![
        create_associated_token_account_idempotent(payer, owner, mint, &SPL_TOKEN_2022_ID),
        mint_to(&SPL_TOKEN_2022_ID, mint, &token_account, authority, &[], amount)?,
    ];
    let revoked = [
        (ExtensionType::PermanentDelegate, AuthorityType::PermanentDelegate),
        (ExtensionType::MintCloseAuthority, AuthorityType::CloseMint),
    ]
    .into_iter()
    .filter(|(extension, _)| extensions.contains(extension))
    .map(|(_, authority_type)| authority_type)
    .chain([AuthorityType::FreezeAccount]);
    for authority_type in revoked {
        instructions.push(set_authority(
            &SPL_TOKEN_2022_ID,
            mint,
            None,
            authority_type,
            authority,
            &[],
        )?);
    }
    Ok(instructions)
}

/// Creates a fungible Token-2022 mint. See
/// [`create_token_extension_mint_instructions`].
pub async fn create_token_extension_mint<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    authority: &Keypair,
    extensions: &[ExtensionType],
    metadata: &TokenMetadataArgs,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let mint = Keypair::new();
    let rent = extension_mint_rent(rpc, extensions, &mint.pubkey(), metadata).await?;
    let instructions = create_token_extension_mint_instructions(
        &payer.pubkey(),
        &authority.pubkey(),
        &mint.pubkey(),
        extensions,
        metadata,
        &rent,
    )?;
    let signature = rpc
        .create_and_send_transaction(
            &instructions,
            &payer.pubkey(),
            &[payer, authority, &mint],
            options.with_compute_unit_limit(COMPUTE_UNIT_LIMIT),
        )
        .await?;
    debug!(
        "Created token extension mint {} with {:?}: {}",
        mint.pubkey(),
        extensions,
        signature
    );
    Ok(mint.pubkey())
}

/// Returns `owner`'s token account holding the minted supply.
#[allow(clippy::too_many_arguments)]
pub async fn mint_tokens_and_revoke_authorities<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    authority: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    extensions: &[ExtensionType],
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let instructions = mint_tokens_and_revoke_authorities_instructions(
        &payer.pubkey(),
        &authority.pubkey(),
        mint,
        owner,
        amount,
        extensions,
    )?;
    let signature = rpc
        .create_and_send_transaction(&instructions, &payer.pubkey(), &[payer, authority], options)
        .await?;
    debug!("Minted {} of {} to {}: {}", amount, mint, owner, signature);
    Ok(get_associated_token_address_with_program_id(
        owner,
        mint,
        &SPL_TOKEN_2022_ID,
    ))
}

/// Creates a group mint and mints its single unit to `beneficiary`.
#[allow(clippy::too_many_arguments)]
pub async fn create_group<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    authority: &Keypair,
    beneficiary: &Pubkey,
    metadata: &TokenMetadataArgs,
    max_size: u32,
    final_authority: Option<Pubkey>,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let mint = Keypair::new();
    let accounts = ExtensionMintAccounts {
        payer: payer.pubkey(),
        authority: authority.pubkey(),
        mint: mint.pubkey(),
        beneficiary: *beneficiary,
        final_authority,
    };
    let rent = extension_mint_rent(rpc, &group_extensions(), &mint.pubkey(), metadata).await?;
    let instructions = create_group_instructions(&accounts, metadata, max_size, &rent)?;

    let signature = rpc
        .create_and_send_transaction(
            &instructions,
            &payer.pubkey(),
            &[payer, authority, &mint],
            options.with_compute_unit_limit(COMPUTE_UNIT_LIMIT),
        )
        .await?;
    debug!("Created token group {}: {}", mint.pubkey(), signature);
    Ok(mint.pubkey())
}

/// Creates a member mint, joined to `group` when given, and mints its single
/// unit to `beneficiary`.
#[allow(clippy::too_many_arguments)]
pub async fn mint_member<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    authority: &Keypair,
    beneficiary: &Pubkey,
    metadata: &TokenMetadataArgs,
    group: Option<(&Pubkey, &Keypair)>,
    final_authority: Option<Pubkey>,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let mint = Keypair::new();
    let accounts = ExtensionMintAccounts {
        payer: payer.pubkey(),
        authority: authority.pubkey(),
        mint: mint.pubkey(),
        beneficiary: *beneficiary,
        final_authority,
    };
    let group_ref = group.map(|(group, update_authority)| ExtensionGroup {
        group: *group,
        update_authority: update_authority.pubkey(),
    });
    let rent = extension_mint_rent(
        rpc,
        &member_extensions(group.is_some()),
        &mint.pubkey(),
        metadata,
    )
    .await?;
    let instructions = create_member_instructions(&accounts, metadata, group_ref.as_ref(), &rent)?;

    let mut signers = vec![payer, authority, &mint];
    if let Some((_, update_authority)) = group {
        signers.push(update_authority);
    }
    let signature = rpc
        .create_and_send_transaction(
            &instructions,
            &payer.pubkey(),
            &signers,
            options.with_compute_unit_limit(COMPUTE_UNIT_LIMIT),
        )
        .await?;
    debug!("Minted token group member {}: {}", mint.pubkey(), signature);
    Ok(mint.pubkey())
}
