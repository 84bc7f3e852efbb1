/*!
 * Protocol layer: data structures, constants, endpoints, and response
 * interpretation.
 *
 * Everything related to *what* we exchange with the push backend:
 * - `types`: request bodies and the platform marker
 * - `constants`: default endpoints, header names
 * - `endpoint`: endpoint configuration and URL building
 * - `response`: turning response bytes into a success flag
 */

pub mod constants;
pub mod endpoint;
pub mod response;
pub mod types;
