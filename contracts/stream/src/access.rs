//! Role table and the restricted-address (compliance) set.
//!
//! Both live in persistent storage and are mutated only through the
//! Admin-gated entrypoints; everything else only reads them.

use soroban_sdk::{Address, Env};

use crate::errors::ContractError;
use crate::storage;
use crate::types::Role;

pub fn has_role(env: &Env, role: Role, address: &Address) -> bool {
    storage::role_members(env, role)
        .iter()
        .any(|member| &member == address)
}

/// Fails with `Unauthorized` unless `caller` holds `role`. Authentication of
/// `caller` is the entrypoint's job.
pub fn require_role(env: &Env, role: Role, caller: &Address) -> Result<(), ContractError> {
    if has_role(env, role, caller) {
        Ok(())
    } else {
        Err(ContractError::Unauthorized)
    }
}

pub fn add_role_member(env: &Env, role: Role, address: Address) -> Result<(), ContractError> {
    let mut members = storage::role_members(env, role);
    if members.iter().any(|member| member == address) {
        return Err(ContractError::RoleAlreadyGranted);
    }
    members.push_back(address);
    storage::set_role_members(env, role, &members);
    Ok(())
}

pub fn remove_role_member(env: &Env, role: Role, address: &Address) -> Result<(), ContractError> {
    let mut members = storage::role_members(env, role);
    let position = members
        .iter()
        .position(|member| &member == address)
        .ok_or(ContractError::RoleNotGranted)?;

    // The contract must always keep someone able to manage roles.
    if role == Role::Admin && members.len() == 1 {
        return Err(ContractError::CannotRevokeLastAdmin);
    }

    members.remove(position as u32);
    storage::set_role_members(env, role, &members);
    Ok(())
}

pub fn is_restricted(env: &Env, address: &Address) -> bool {
    storage::restricted_addresses(env)
        .iter()
        .any(|restricted| &restricted == address)
}

/// Compliance gate for every path that designates a new fund destination.
pub fn validate_receiver(env: &Env, address: &Address) -> Result<(), ContractError> {
    if is_restricted(env, address) {
        return Err(ContractError::AddressRestricted);
    }
    Ok(())
}

pub fn restrict(env: &Env, address: Address) -> Result<(), ContractError> {
    let mut restricted = storage::restricted_addresses(env);
    if restricted.iter().any(|a| a == address) {
        return Err(ContractError::AlreadyRestricted);
    }
    restricted.push_back(address);
    storage::set_restricted_addresses(env, &restricted);
    Ok(())
}

pub fn unrestrict(env: &Env, address: &Address) -> Result<(), ContractError> {
    let mut restricted = storage::restricted_addresses(env);
    let position = restricted
        .iter()
        .position(|a| &a == address)
        .ok_or(ContractError::NotRestricted)?;
    restricted.remove(position as u32);
    storage::set_restricted_addresses(env, &restricted);
    Ok(())
}
